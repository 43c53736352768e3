//! Repository tests against a real Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use actix_web::{App, http::StatusCode, test};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sqlx::PgPool;

use sportly::database::models::{InvitationDetail, RatingInput};
use sportly::error::AppError;
use sportly::handlers::shared::ApiResponse;
use sportly::services::registration::JoinRejection;
use sportly::{InvitationRepository, ParticipantRepository, RatingRepository};

mod common;

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_join_until_full(pool: PgPool) {
    let participants = ParticipantRepository::new(pool.clone());
    let owner = common::create_user(&pool).await;
    let invitation =
        common::create_invitation(&pool, &owner, Utc::now() + Duration::days(1), 2).await;
    let now = Utc::now();

    let a = common::create_user(&pool).await;
    let b = common::create_user(&pool).await;
    let c = common::create_user(&pool).await;

    assert!(participants.join(invitation.id, a.id, now).await.unwrap().into_result().is_ok());
    assert_eq!(participants.count_for(invitation.id).await.unwrap(), 1);
    assert!(participants.join(invitation.id, b.id, now).await.unwrap().into_result().is_ok());
    assert_eq!(participants.count_for(invitation.id).await.unwrap(), 2);

    let rejected = participants.join(invitation.id, c.id, now).await.unwrap().into_result();
    assert_eq!(rejected.unwrap_err(), JoinRejection::Full { capacity: 2 });
    assert_eq!(participants.count_for(invitation.id).await.unwrap(), 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_duplicate_join_rejected(pool: PgPool) {
    let participants = ParticipantRepository::new(pool.clone());
    let owner = common::create_user(&pool).await;
    let invitation =
        common::create_invitation(&pool, &owner, Utc::now() + Duration::days(1), 4).await;
    let player = common::create_user(&pool).await;

    participants
        .join(invitation.id, player.id, Utc::now())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    let second = participants
        .join(invitation.id, player.id, Utc::now())
        .await
        .unwrap()
        .into_result();

    assert_eq!(second.unwrap_err(), JoinRejection::AlreadyJoined);
    assert_eq!(participants.count_for(invitation.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_concurrent_joins_never_exceed_capacity(pool: PgPool) {
    let participants = ParticipantRepository::new(pool.clone());
    let owner = common::create_user(&pool).await;
    let invitation =
        common::create_invitation(&pool, &owner, Utc::now() + Duration::days(1), 3).await;

    let mut players = Vec::new();
    for _ in 0..8 {
        players.push(common::create_user(&pool).await);
    }

    let handles: Vec<_> = players
        .iter()
        .map(|player| {
            let participants = participants.clone();
            let (invitation_id, user_id) = (invitation.id, player.id);
            tokio::spawn(async move {
                participants
                    .join(invitation_id, user_id, Utc::now())
                    .await
                    .unwrap()
                    .into_result()
            })
        })
        .collect();

    let mut joined = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => joined += 1,
            Err(JoinRejection::Full { .. }) => full += 1,
            Err(other) => panic!("unexpected rejection: {}", other),
        }
    }

    assert_eq!(joined, 3);
    assert_eq!(full, 5);
    assert_eq!(participants.count_for(invitation.id).await.unwrap(), 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_join_rejects_cancelled_and_missing(pool: PgPool) {
    let invitations = InvitationRepository::new(pool.clone());
    let participants = ParticipantRepository::new(pool.clone());
    let owner = common::create_user(&pool).await;
    let player = common::create_user(&pool).await;
    let invitation =
        common::create_invitation(&pool, &owner, Utc::now() + Duration::days(1), 4).await;

    invitations.cancel(invitation.id).await.unwrap().unwrap();
    assert!(invitations.cancel(invitation.id).await.unwrap().is_none());

    let cancelled = participants
        .join(invitation.id, player.id, Utc::now())
        .await
        .unwrap()
        .into_result();
    assert_eq!(cancelled.unwrap_err(), JoinRejection::Cancelled);

    let missing = participants
        .join(uuid::Uuid::new_v4(), player.id, Utc::now())
        .await
        .unwrap()
        .into_result();
    assert_eq!(missing.unwrap_err(), JoinRejection::NotFound);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_leave(pool: PgPool) {
    let participants = ParticipantRepository::new(pool.clone());
    let owner = common::create_user(&pool).await;
    let player = common::create_user(&pool).await;
    let invitation =
        common::create_invitation(&pool, &owner, Utc::now() + Duration::days(1), 4).await;

    assert!(!participants.leave(invitation.id, player.id).await.unwrap());

    participants
        .join(invitation.id, player.id, Utc::now())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert!(participants.leave(invitation.id, player.id).await.unwrap());
    assert_eq!(participants.count_for(invitation.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_counts_and_joined_map(pool: PgPool) {
    let participants = ParticipantRepository::new(pool.clone());
    let owner = common::create_user(&pool).await;
    let player = common::create_user(&pool).await;
    let start = Utc::now() + Duration::days(1);
    let first = common::create_invitation(&pool, &owner, start, 4).await;
    let second = common::create_invitation(&pool, &owner, start, 4).await;

    participants
        .join(first.id, player.id, Utc::now())
        .await
        .unwrap()
        .into_result()
        .unwrap();

    let counts = participants.counts_for(&[first.id, second.id]).await.unwrap();
    assert_eq!(counts[&first.id], 1);
    assert_eq!(counts[&second.id], 0);

    let joined = participants
        .joined_map(player.id, &[first.id, second.id])
        .await
        .unwrap();
    assert!(joined[&first.id]);
    assert!(!joined[&second.id]);

    assert!(participants.counts_for(&[]).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_feed_lists_only_open_invitations(pool: PgPool) {
    let invitations = InvitationRepository::new(pool.clone());
    let owner = common::create_user(&pool).await;
    let now = Utc::now();

    let later = common::create_invitation(&pool, &owner, now + Duration::days(2), 4).await;
    let sooner = common::create_invitation(&pool, &owner, now + Duration::hours(3), 4).await;
    let past = common::create_invitation(&pool, &owner, now - Duration::hours(1), 4).await;
    let cancelled = common::create_invitation(&pool, &owner, now + Duration::days(1), 4).await;
    invitations.cancel(cancelled.id).await.unwrap();

    let feed: Vec<_> = invitations
        .list_feed(now)
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.invitation.id)
        .collect();

    assert_eq!(feed, vec![sooner.id, later.id]);
    assert!(!feed.contains(&past.id));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_duplicate_rating_is_conflict(pool: PgPool) {
    let ratings = RatingRepository::new(pool.clone());
    let owner = common::create_user(&pool).await;
    let player = common::create_user(&pool).await;
    let invitation =
        common::create_invitation(&pool, &owner, Utc::now() - Duration::hours(3), 4).await;

    let input = RatingInput {
        invitation_id: invitation.id,
        rated_user_id: player.id,
        rating: 5,
        comment: None,
        would_play_again: Some(true),
    };

    ratings.create(owner.id, &input).await.unwrap();
    let error = AppError::from(ratings.create(owner.id, &input).await.unwrap_err());
    assert!(matches!(error, AppError::Conflict(_)));

    assert_eq!(ratings.stats_rows(player.id).await.unwrap(), vec![(5, true)]);
    assert_eq!(ratings.list_received(player.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_create_and_join_over_http(pool: PgPool) {
    let state = common::state_for(pool.clone());
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let owner = common::create_user(&pool).await;
    let player = common::create_user(&pool).await;
    let late = common::create_user(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/invitations")
        .insert_header(common::bearer(&owner))
        .set_json(json!({
            "sport_id": common::BADMINTON_ID,
            "venue": "  <b>GOR</b> Bulungan ",
            "start_at": Utc::now() + Duration::days(3),
            "duration_hours": "1.5",
            "capacity": 2,
            "note": "Bring your own racket"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: ApiResponse<InvitationDetail> = test::read_body_json(resp).await;
    let detail = body.data.unwrap();
    assert_eq!(detail.invitation.venue, "GOR Bulungan");
    assert_eq!(detail.sport_name, "Badminton");
    assert_eq!(detail.participant_count, 0);
    let id = detail.invitation.id;

    for (user, expected) in [
        (&owner, StatusCode::CREATED),
        (&player, StatusCode::CREATED),
        (&late, StatusCode::CONFLICT),
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/invitations/{}/join", id))
            .insert_header(common::bearer(user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/invitations?search=bulungan&date=all")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: ApiResponse<Vec<Value>> = test::read_body_json(resp).await;
    let feed = body.data.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["participant_count"], 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_update_rules_over_http(pool: PgPool) {
    let state = common::state_for(pool.clone());
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let participants = ParticipantRepository::new(pool.clone());

    let owner = common::create_user(&pool).await;
    let stranger = common::create_user(&pool).await;
    let start_at = Utc::now() + Duration::days(2);
    let invitation = common::create_invitation(&pool, &owner, start_at, 4).await;

    for _ in 0..3 {
        let player = common::create_user(&pool).await;
        let joined = participants.join(invitation.id, player.id, Utc::now()).await.unwrap();
        assert!(joined.into_result().is_ok());
    }

    let uri = format!("/api/v1/invitations/{}", invitation.id);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(common::bearer(&stranger))
        .set_json(common::invitation_input(common::BADMINTON_ID, start_at, 4))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(common::bearer(&owner))
        .set_json(common::invitation_input(common::BADMINTON_ID, start_at, 2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["field"], "capacity");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(common::bearer(&owner))
        .set_json(common::invitation_input(common::BADMINTON_ID, start_at, 3))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<InvitationDetail> = test::read_body_json(resp).await;
    assert_eq!(body.data.unwrap().invitation.capacity, 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_cancel_twice_and_leave_without_joining_over_http(pool: PgPool) {
    let state = common::state_for(pool.clone());
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let owner = common::create_user(&pool).await;
    let player = common::create_user(&pool).await;
    let invitation =
        common::create_invitation(&pool, &owner, Utc::now() + Duration::days(2), 4).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/invitations/{}/leave", invitation.id))
        .insert_header(common::bearer(&player))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Not found: You have not joined this invitation");

    let cancel = format!("/api/v1/invitations/{}/cancel", invitation.id);

    let req = test::TestRequest::post()
        .uri(&cancel)
        .insert_header(common::bearer(&player))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
        let req = test::TestRequest::post()
            .uri(&cancel)
            .insert_header(common::bearer(&owner))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }

    let stored = InvitationRepository::new(pool.clone())
        .find_by_id(invitation.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.is_canceled);
}
