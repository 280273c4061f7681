use super::*;

#[tokio::test]
async fn orders_are_invisible_across_owners() {
    let service = create_test_service().await;
    let owner_a = attendant("ana");
    let owner_b = attendant("bruno");

    let order = service.create(&owner_a, crown_order()).await.unwrap();
    let id = order.id_string();

    // Lookup by the other owner reports the same NotFound as a missing id
    assert!(matches!(
        service.get(&owner_b, &id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.get_status(&owner_b, &id).await,
        Err(AppError::NotFound(_))
    ));

    // And the listing stays empty
    let page = service
        .list(&owner_b, OrderListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 0);
}

#[tokio::test]
async fn mutations_across_owners_are_not_found() {
    let service = create_test_service().await;
    let owner_a = attendant("ana");
    let owner_b = attendant("bruno");

    let order = service.create(&owner_a, crown_order()).await.unwrap();
    let id = order.id_string();

    let patch = UpdateOrderRequest {
        patient: Some("Intruder Edit".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.update(&owner_b, &id, patch).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(&owner_b, &id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.advance(&owner_b, &id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service
            .add_service(&owner_b, &id, service_item("Implant", 50))
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service
            .add_comment(
                &owner_b,
                &id,
                Comment {
                    content: "not mine".to_string()
                }
            )
            .await,
        Err(AppError::NotFound(_))
    ));

    // The order is untouched for its real owner
    let current = service.get(&owner_a, &id).await.unwrap();
    assert_eq!(current.patient, "Maria Souza");
    assert_eq!(current.state, OrderState::Created);
    assert_eq!(current.services.len(), 1);
    assert!(current.comments.is_empty());
}

#[tokio::test]
async fn stats_are_owner_scoped() {
    let service = create_test_service().await;
    let owner_a = attendant("ana");
    let owner_b = attendant("bruno");

    service.create(&owner_a, crown_order()).await.unwrap();
    service
        .create(&owner_b, order_for("Pedro Gomes", "Dr. Costa", 300))
        .await
        .unwrap();

    let stats = service.stats(&owner_b).await.unwrap();
    let created = stats
        .iter()
        .find(|s| s.state == OrderState::Created)
        .unwrap();
    assert_eq!(created.count, 1);
    assert_eq!(created.total_value, Decimal::from(300));
}

#[tokio::test]
async fn customers_may_read_but_not_mutate() {
    let service = create_test_service().await;
    let staff = attendant("ana");
    // Same user id, weaker role: ownership is not the thing being tested
    let reader = user_with_role("ana", "CUSTOMER");

    let order = service.create(&staff, crown_order()).await.unwrap();
    let id = order.id_string();

    // Reads pass
    assert!(service.get(&reader, &id).await.is_ok());
    assert!(service.list(&reader, OrderListQuery::default()).await.is_ok());
    assert!(service.stats(&reader).await.is_ok());

    // Mutations fail with Forbidden even though the order is theirs
    assert!(matches!(
        service.create(&reader, crown_order()).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        service.advance(&reader, &id).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        service.delete(&reader, &id).await,
        Err(AppError::Forbidden(_))
    ));

    let current = service.get(&staff, &id).await.unwrap();
    assert_eq!(current.state, OrderState::Created);
    assert_eq!(current.status, OrderStatus::Active);
}

#[tokio::test]
async fn unknown_role_is_rejected_outright() {
    let service = create_test_service().await;
    let stranger = user_with_role("ana", "INTERN");

    let err = service.create(&stranger, crown_order()).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(msg) if msg.contains("not found")));

    assert!(matches!(
        service.list(&stranger, OrderListQuery::default()).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn all_staff_roles_may_manage_their_own_orders() {
    let service = create_test_service().await;

    for (key, role) in [
        ("ana", "ATTENDANT"),
        ("lia", "LAB_ADMIN"),
        ("sam", "SUPER_ADMIN"),
    ] {
        let user = user_with_role(key, role);
        let order = service.create(&user, crown_order()).await.unwrap();
        let advanced = service.advance(&user, &order.id_string()).await.unwrap();
        assert_eq!(advanced.state, OrderState::Analysis, "role {role}");
    }
}
