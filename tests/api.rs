mod helpers;

use coupon_ledger_domain::{Coordinates, Promotion, ID};
use coupon_ledger_sdk::{
    APIError, BookingStatus, CreateBookingInput, FindNearbyInput, RedeemInput,
};
use futures::future::join_all;
use helpers::setup::{spawn_app, HOUR, NOW};

#[actix_web::test]
async fn test_status_ok() {
    let (_, sdk, _) = spawn_app().await;
    assert!(sdk.status.check_health().await.is_ok());
}

#[actix_web::test]
async fn test_booking_lifecycle() {
    let (app, sdk, _) = spawn_app().await;
    let user = app.insert_user().await;
    let promotion = app
        .insert_promotion(
            Promotion::new(ID::default(), "2x1 tacos", NOW - HOUR, NOW + HOUR).with_stock(3),
        )
        .await;
    let input = || CreateBookingInput {
        user_id: user.id.clone(),
        promotion_id: promotion.id.clone(),
        limit_use_date: None,
    };

    let booking = sdk.booking.create(input()).await.unwrap().booking;
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.auto_expire_at, NOW + app.ctx.config.booking_timeouts.expire_after);

    // Creating again is idempotent
    let again = sdk.booking.create(input()).await.unwrap().booking;
    assert_eq!(again.id, booking.id);

    let cancelled = sdk.booking.cancel(booking.id.clone()).await.unwrap().booking;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let res = sdk.booking.create(input()).await;
    let cooldown_secs = (app.ctx.config.booking_timeouts.cooldown + 999) / 1000;
    assert_eq!(
        res.unwrap_err(),
        APIError::TooManyRequests(Some(cooldown_secs as u64))
    );

    app.sys
        .advance_millis(app.ctx.config.booking_timeouts.cooldown + 1);
    let reopened = sdk.booking.create(input()).await.unwrap().booking;
    assert_eq!(reopened.id, booking.id);
    assert_eq!(reopened.status, BookingStatus::Pending);

    let fetched = sdk.booking.get(booking.id.clone()).await.unwrap().booking;
    assert_eq!(fetched, reopened);
}

#[actix_web::test]
async fn test_booking_errors() {
    let (app, sdk, _) = spawn_app().await;
    let user = app.insert_user().await;

    let res = sdk
        .booking
        .create(CreateBookingInput {
            user_id: user.id.clone(),
            promotion_id: ID::default(),
            limit_use_date: None,
        })
        .await;
    assert_eq!(res.unwrap_err(), APIError::NotFound);

    assert_eq!(
        sdk.booking.get(ID::default()).await.unwrap_err(),
        APIError::NotFound
    );
    assert_eq!(
        sdk.booking.cancel(ID::default()).await.unwrap_err(),
        APIError::NotFound
    );
}

#[actix_web::test]
async fn test_parallel_redemptions_never_oversell() {
    let (app, sdk, _) = spawn_app().await;
    let (collaborator, branch) = app.insert_collaborator("Tacos", None).await;
    let promotion = app
        .insert_promotion(
            Promotion::new(collaborator.id.clone(), "2x1", NOW - HOUR, NOW + HOUR).with_stock(10),
        )
        .await;

    let mut inputs = Vec::new();
    for i in 0..50 {
        let user = app.insert_user().await;
        inputs.push(RedeemInput {
            user_id: user.id,
            promotion_id: promotion.id.clone(),
            branch_id: branch.id.clone(),
            nonce: Some(format!("qr-{}", i)),
        });
    }
    let results = join_all(inputs.into_iter().map(|input| sdk.redemption.redeem(input))).await;

    let redeemed = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(APIError::Conflict)))
        .count();
    assert_eq!(redeemed, 10);
    assert_eq!(conflicts, 40);

    let promotion = app
        .ctx
        .repos
        .promotion_repo
        .find(&promotion.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(promotion.available_stock, Some(0));
}

#[actix_web::test]
async fn test_redemption_rejections() {
    let (app, sdk, _) = spawn_app().await;
    let user = app.insert_user().await;
    let (collaborator, branch) = app.insert_collaborator("Coffee", None).await;
    let promotion = app
        .insert_promotion(
            Promotion::new(collaborator.id.clone(), "Free refill", NOW - HOUR, NOW + HOUR)
                .with_stock(5),
        )
        .await;
    let input = |nonce: &str| RedeemInput {
        user_id: user.id.clone(),
        promotion_id: promotion.id.clone(),
        branch_id: branch.id.clone(),
        nonce: Some(nonce.to_string()),
    };

    let coupon = sdk.redemption.redeem(input("abc")).await.unwrap().coupon;
    assert_eq!(coupon.used_at, NOW);
    assert_eq!(coupon.branch_id, branch.id);

    assert_eq!(
        sdk.redemption.redeem(input("abc")).await.unwrap_err(),
        APIError::Conflict
    );
    assert_eq!(
        sdk.redemption.redeem(input(" ")).await.unwrap_err(),
        APIError::BadClientData
    );

    let mut unknown_branch = input("def");
    unknown_branch.branch_id = ID::default();
    assert_eq!(
        sdk.redemption.redeem(unknown_branch).await.unwrap_err(),
        APIError::NotFound
    );
}

#[actix_web::test]
async fn test_find_nearby() {
    let (app, sdk, _) = spawn_app().await;
    // Roughly 1.1 and 5.5 km north of the origin
    let (near, _) = app
        .insert_collaborator("near", Coordinates::new(0.0, 0.01))
        .await;
    app.insert_collaborator("far", Coordinates::new(0.0, 0.05))
        .await;
    app.insert_collaborator("unknown", None).await;

    let res = sdk
        .proximity
        .find_nearby(FindNearbyInput {
            lat: 0.0,
            lon: 0.0,
            radius_km: None,
        })
        .await
        .unwrap();
    assert_eq!(res.collaborators.len(), 1);
    assert_eq!(res.collaborators[0].id, near.id);
    assert_eq!(res.collaborators[0].distance, 1.11);
    assert_eq!(res.collaborators[0].total_branches_with_location, 1);

    let res = sdk
        .proximity
        .find_nearby(FindNearbyInput {
            lat: 0.0,
            lon: 0.0,
            radius_km: Some(10.0),
        })
        .await
        .unwrap();
    assert_eq!(res.collaborators.len(), 2);

    let res = sdk
        .proximity
        .find_nearby(FindNearbyInput {
            lat: 0.0,
            lon: 0.0,
            radius_km: Some(0.0),
        })
        .await;
    assert_eq!(res.unwrap_err(), APIError::BadClientData);
}

#[actix_web::test]
async fn test_expiry_sweep_is_idempotent() {
    let (app, sdk, _) = spawn_app().await;
    let (collaborator, _) = app.insert_collaborator("Tacos", None).await;
    app.insert_promotion(Promotion::new(
        collaborator.id.clone(),
        "Last call",
        NOW - HOUR,
        NOW + 2 * HOUR,
    ))
    .await;

    let first = sdk.sweep.run_expiry_sweep().await.unwrap();
    assert_eq!(first.processed, 1);
    assert_eq!(first.failed, 0);

    let second = sdk.sweep.run_expiry_sweep().await.unwrap();
    assert_eq!(second.processed, 0);
}
