use super::*;

#[tokio::test]
async fn create_starts_at_created_and_active() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let order = service.create(&user, crown_order()).await.unwrap();

    assert!(order.id.is_some());
    assert_eq!(order.user_id, user.id);
    assert_eq!(order.state, OrderState::Created);
    assert_eq!(order.status, OrderStatus::Active);
    assert!(order.comments.is_empty());
    assert_eq!(order.services.len(), 1);
    assert_eq!(order.services[0].status, ServiceStatus::Pending);
    assert!(order.created_at > 0);
}

#[tokio::test]
async fn full_walk_ends_in_final_state() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let order = service.create(&user, crown_order()).await.unwrap();
    let id = order.id_string();
    assert_eq!(order.state, OrderState::Created);

    let order = service.advance(&user, &id).await.unwrap();
    assert_eq!(order.state, OrderState::Analysis);

    let order = service.advance(&user, &id).await.unwrap();
    assert_eq!(order.state, OrderState::Completed);

    // A third advance fails and leaves the order untouched
    let err = service.advance(&user, &id).await.unwrap_err();
    assert!(matches!(err, AppError::FinalStateReached));

    let current = service.get(&user, &id).await.unwrap();
    assert_eq!(current.state, OrderState::Completed);
}

#[tokio::test]
async fn create_without_services_persists_nothing() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let req = CreateOrderRequest {
        services: vec![],
        ..crown_order()
    };
    let err = service.create(&user, req).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let page = service.list(&user, OrderListQuery::default()).await.unwrap();
    assert_eq!(page.pagination.total, 0);
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn create_rejects_invalid_fields() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let short_lab = CreateOrderRequest {
        lab: "X".to_string(),
        ..crown_order()
    };
    assert!(matches!(
        service.create(&user, short_lab).await,
        Err(AppError::Validation(_))
    ));

    let short_patient = CreateOrderRequest {
        patient: "Jo".to_string(),
        ..crown_order()
    };
    assert!(matches!(
        service.create(&user, short_patient).await,
        Err(AppError::Validation(_))
    ));

    let free_service = CreateOrderRequest {
        services: vec![service_item("Crown", 0)],
        ..crown_order()
    };
    assert!(matches!(
        service.create(&user, free_service).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn update_patches_only_provided_fields() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let order = service.create(&user, crown_order()).await.unwrap();
    let id = order.id_string();

    let patch = UpdateOrderRequest {
        patient: Some("Joana Alves".to_string()),
        ..Default::default()
    };
    let updated = service.update(&user, &id, patch).await.unwrap();

    assert_eq!(updated.patient, "Joana Alves");
    assert_eq!(updated.lab, order.lab);
    assert_eq!(updated.customer, order.customer);
    assert_eq!(updated.services, order.services);
    assert_eq!(updated.state, OrderState::Created);
}

#[tokio::test]
async fn update_cannot_touch_state() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let order = service.create(&user, crown_order()).await.unwrap();
    let id = order.id_string();

    let patch = UpdateOrderRequest {
        patient: Some("Joana Alves".to_string()),
        state: Some(OrderState::Completed),
        ..Default::default()
    };
    let err = service.update(&user, &id, patch).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));

    // Neither the state nor the rest of the patch was applied
    let current = service.get(&user, &id).await.unwrap();
    assert_eq!(current.state, OrderState::Created);
    assert_eq!(current.patient, order.patient);
}

#[tokio::test]
async fn update_rejects_emptied_services() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let order = service.create(&user, crown_order()).await.unwrap();
    let id = order.id_string();

    let patch = UpdateOrderRequest {
        services: Some(vec![]),
        ..Default::default()
    };
    assert!(matches!(
        service.update(&user, &id, patch).await,
        Err(AppError::Validation(_))
    ));

    // The standing invariant holds after the rejected write
    let current = service.get(&user, &id).await.unwrap();
    assert_eq!(current.services.len(), 1);
}

#[tokio::test]
async fn update_unknown_order_is_not_found() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let patch = UpdateOrderRequest {
        patient: Some("Joana Alves".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.update(&user, "order:missing", patch).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn add_service_appends_until_completed() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let order = service.create(&user, crown_order()).await.unwrap();
    let id = order.id_string();

    let updated = service
        .add_service(&user, &id, service_item("Whitening block", 200))
        .await
        .unwrap();
    assert_eq!(updated.services.len(), 2);
    assert_eq!(updated.services[1].name, "Whitening block");

    // Non-positive values never make it in
    assert!(matches!(
        service.add_service(&user, &id, service_item("Freebie", 0)).await,
        Err(AppError::Validation(_))
    ));

    service.advance(&user, &id).await.unwrap();
    service.advance(&user, &id).await.unwrap();

    let err = service
        .add_service(&user, &id, service_item("Late addition", 50))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let current = service.get(&user, &id).await.unwrap();
    assert_eq!(current.services.len(), 2);
}

#[tokio::test]
async fn comments_append_in_order() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let order = service.create(&user, crown_order()).await.unwrap();
    let id = order.id_string();

    for content in ["mold received", "shade confirmed with dentist"] {
        service
            .add_comment(
                &user,
                &id,
                Comment {
                    content: content.to_string(),
                },
            )
            .await
            .unwrap();
    }

    let current = service.get(&user, &id).await.unwrap();
    let contents: Vec<&str> = current.comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, ["mold received", "shade confirmed with dentist"]);

    assert!(matches!(
        service
            .add_comment(&user, &id, Comment { content: "  ".to_string() })
            .await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn delete_is_soft_and_hides_the_order() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let order = service.create(&user, crown_order()).await.unwrap();
    let id = order.id_string();

    service.delete(&user, &id).await.unwrap();

    // Gone from lookups and from the default listing
    assert!(matches!(
        service.get(&user, &id).await,
        Err(AppError::NotFound(_))
    ));
    let page = service.list(&user, OrderListQuery::default()).await.unwrap();
    assert_eq!(page.pagination.total, 0);

    // Still there under an explicit DELETED filter
    let deleted_query = OrderListQuery {
        status: Some(OrderStatus::Deleted),
        ..Default::default()
    };
    let page = service.list(&user, deleted_query).await.unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.data[0].status, OrderStatus::Deleted);

    // Deleting again reports NotFound
    assert!(matches!(
        service.delete(&user, &id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn status_projection_tracks_the_walk() {
    let service = create_test_service().await;
    let user = attendant("ana");

    let order = service.create(&user, crown_order()).await.unwrap();
    let id = order.id_string();

    let view = service.get_status(&user, &id).await.unwrap();
    assert_eq!(view.id, id);
    assert_eq!(view.state, OrderState::Created);
    assert_eq!(view.status, OrderStatus::Active);

    service.advance(&user, &id).await.unwrap();
    let view = service.get_status(&user, &id).await.unwrap();
    assert_eq!(view.state, OrderState::Analysis);
}

/// Two racing advances may both succeed (they observe consecutive stages),
/// but the stages actually walked must equal the number of successes; a
/// lost update would break that accounting.
#[tokio::test]
async fn concurrent_advances_never_lose_updates() {
    use shared::order::STATE_SEQUENCE;

    let db = DbService::open_in_memory().await.unwrap();
    let service_a = OrderService::new(OrderRepository::new(db.db.clone()));
    let service_b = OrderService::new(OrderRepository::new(db.db.clone()));
    let user = attendant("ana");

    let order = service_a.create(&user, crown_order()).await.unwrap();
    let id = order.id_string();

    let (first, second) = tokio::join!(
        service_a.advance(&user, &id),
        service_b.advance(&user, &id)
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert!(successes >= 1);

    for result in [&first, &second] {
        if let Err(err) = result {
            assert!(
                matches!(err, AppError::Conflict(_) | AppError::FinalStateReached),
                "unexpected racing-advance error: {err}"
            );
        }
    }

    let current = service_a.get(&user, &id).await.unwrap();
    let position = STATE_SEQUENCE
        .iter()
        .position(|&s| s == current.state)
        .unwrap();
    assert_eq!(position, successes, "every success is exactly one stage");
}

/// Drive a random mix of operations and observe that the state index only
/// ever moves forward, one stage at a time.
#[tokio::test]
async fn random_operations_never_move_state_backwards() {
    use rand::Rng;
    use shared::order::STATE_SEQUENCE;

    let service = create_test_service().await;
    let user = attendant("ana");

    let order = service.create(&user, crown_order()).await.unwrap();
    let id = order.id_string();

    let position = |state: OrderState| {
        STATE_SEQUENCE.iter().position(|&s| s == state).unwrap()
    };

    let mut rng = rand::thread_rng();
    let mut last_pos = position(order.state);

    for i in 0..40i64 {
        match rng.gen_range(0..4u8) {
            0 => {
                let _ = service.advance(&user, &id).await;
            }
            1 => {
                let _ = service
                    .add_service(&user, &id, service_item("Extra", 10 + i))
                    .await;
            }
            2 => {
                let _ = service
                    .add_comment(
                        &user,
                        &id,
                        Comment {
                            content: format!("note {i}"),
                        },
                    )
                    .await;
            }
            _ => {
                let patch = UpdateOrderRequest {
                    customer: Some(format!("Dr. Number {i}")),
                    ..Default::default()
                };
                let _ = service.update(&user, &id, patch).await;
            }
        }

        let pos = position(service.get(&user, &id).await.unwrap().state);
        assert!(pos >= last_pos, "state regressed from {last_pos} to {pos}");
        assert!(pos - last_pos <= 1, "state jumped from {last_pos} to {pos}");
        last_pos = pos;
    }
}
