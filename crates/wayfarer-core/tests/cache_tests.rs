mod common;

use std::{sync::atomic::Ordering, sync::Arc, time::Duration};

use common::{create_test_cache, itinerary_json, open_cache, MockApi};
use serde_json::json;
use wayfarer_core::{
    params::ListItineraries, ActionKind, CacheConfig, DataSource, ItineraryCacheBuilder,
    ItineraryFilter, ItineraryStatus, MemoryStore, MutationOutcome, Notice, SortOrder,
    WayfarerError,
};

fn titles(items: &[wayfarer_core::Itinerary]) -> Vec<String> {
    items.iter().map(|i| i.title().to_string()).collect()
}

#[tokio::test]
async fn test_snapshot_overwrite_replaces_previous_list() {
    let (_dir, cache) = create_test_cache(MockApi::new()).await;

    let a = json!([itinerary_json("1", "Porto"), itinerary_json("2", "Kyoto")]);
    let b = json!([itinerary_json("3", "Lima")]);

    cache.save_itineraries_offline(&a).await;
    assert_eq!(titles(&cache.get_offline_itineraries().await), vec!["Porto", "Kyoto"]);

    cache.save_itineraries_offline(&b).await;
    assert_eq!(titles(&cache.get_offline_itineraries().await), vec!["Lima"]);
}

#[tokio::test]
async fn test_non_list_snapshot_leaves_previous_in_place() {
    let (_dir, cache) = create_test_cache(MockApi::new()).await;

    cache
        .save_itineraries_offline(&json!([itinerary_json("1", "Porto")]))
        .await;
    cache.save_itineraries_offline(&json!("not-a-list")).await;
    cache
        .save_itineraries_offline(&json!({ "_id": "2", "title": "x" }))
        .await;

    assert_eq!(titles(&cache.get_offline_itineraries().await), vec!["Porto"]);
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let api = MockApi::new();
    let (dir, cache) = create_test_cache(api.clone()).await;
    cache
        .save_itineraries_offline(&json!([itinerary_json("1", "Porto")]))
        .await;
    cache
        .add_pending_sync(ActionKind::Delete, "1", None)
        .await
        .expect("queued");
    drop(cache);

    let reopened = open_cache(dir.path(), api).await;
    assert_eq!(titles(&reopened.get_offline_itineraries().await), vec!["Porto"]);
    assert_eq!(reopened.get_pending_sync().await.len(), 1);
}

#[tokio::test]
async fn test_connection_verdict_is_reused_within_window() {
    let api = MockApi::new();
    let cache = ItineraryCacheBuilder::new()
        .with_store(Arc::new(MemoryStore::new()))
        .with_config(CacheConfig::default())
        .with_api(api.clone())
        .build()
        .await
        .unwrap();

    assert!(cache.check_connection().await);
    api.set_online(false);
    assert!(cache.check_connection().await);
    assert!(cache.connection_status());
    assert_eq!(api.probes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_online_load_returns_network_data_and_saves_it() {
    let api = MockApi::new();
    api.set_list_body(json!({
        "itineraries": [itinerary_json("1", "Porto"), itinerary_json("2", "Kyoto")],
        "pagination": { "total": 12, "page": 1, "limit": 2, "pages": 6, "hasNext": true, "hasPrev": false }
    }));
    let (_dir, cache) = create_test_cache(api).await;

    let outcome = cache.load_itineraries(&ListItineraries::default()).await;
    assert_eq!(outcome.source, DataSource::Network);
    assert_eq!(outcome.notice, None);
    assert_eq!(titles(&outcome.itineraries), vec!["Porto", "Kyoto"]);
    assert_eq!(outcome.pagination.map(|p| p.pages), Some(6));

    assert_eq!(cache.get_offline_itineraries().await, outcome.itineraries);
}

#[tokio::test]
async fn test_offline_load_serves_snapshot_without_fetching() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .save_itineraries_offline(&json!([itinerary_json("1", "Porto")]))
        .await;
    api.set_online(false);

    let outcome = cache.load_itineraries(&ListItineraries::default()).await;
    assert_eq!(outcome.source, DataSource::Cache);
    assert_eq!(outcome.notice, None);
    assert_eq!(titles(&outcome.itineraries), vec!["Porto"]);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_fetch_with_snapshot_shows_cached_notice() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .save_itineraries_offline(&json!([itinerary_json("1", "Porto")]))
        .await;
    api.fail_list(500);

    let outcome = cache.load_itineraries(&ListItineraries::default()).await;
    assert_eq!(outcome.source, DataSource::Cache);
    assert_eq!(outcome.notice, Some(Notice::ShowingCached));
    assert_eq!(titles(&outcome.itineraries), vec!["Porto"]);
}

#[tokio::test]
async fn test_failed_fetch_without_snapshot_shows_error_notice() {
    let api = MockApi::new();
    api.fail_list(502);
    let (_dir, cache) = create_test_cache(api).await;

    let outcome = cache.load_itineraries(&ListItineraries::default()).await;
    assert!(outcome.itineraries.is_empty());
    assert_eq!(outcome.notice, Some(Notice::LoadFailed));
}

#[tokio::test]
async fn test_unauthorized_fetch_serves_snapshot_silently() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .save_itineraries_offline(&json!([itinerary_json("1", "Porto")]))
        .await;
    api.fail_list(401);

    let outcome = cache.load_itineraries(&ListItineraries::default()).await;
    assert_eq!(outcome.notice, None);
    assert_eq!(titles(&outcome.itineraries), vec!["Porto"]);
}

#[tokio::test]
async fn test_pending_queue_order_and_removal() {
    let (_dir, cache) = create_test_cache(MockApi::new()).await;

    let a1 = cache
        .add_pending_sync(ActionKind::Create, "local-1", Some(json!({ "title": "A" })))
        .await
        .unwrap();
    let a2 = cache
        .add_pending_sync(ActionKind::Update, "srv-2", Some(json!({ "title": "B" })))
        .await
        .unwrap();
    let a3 = cache
        .add_pending_sync(ActionKind::Delete, "srv-3", None)
        .await
        .unwrap();

    assert_eq!(
        cache.get_pending_sync().await,
        vec![a1.clone(), a2.clone(), a3.clone()]
    );

    assert!(cache.remove_pending_sync(&a2.id).await);
    assert!(!cache.remove_pending_sync(&a2.id).await);
    assert_eq!(cache.get_pending_sync().await, vec![a1, a3]);
}

#[tokio::test]
async fn test_sync_while_offline_leaves_queue_untouched() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;
    let action = cache
        .add_pending_sync(ActionKind::Delete, "srv-1", None)
        .await
        .unwrap();
    api.set_online(false);

    let report = cache.sync_pending_actions().await;
    assert!(report.skipped_offline);
    assert_eq!(report.attempted, 0);
    assert_eq!(cache.get_pending_sync().await, vec![action]);
    assert!(api.deleted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_drains_queue_on_success() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .save_itineraries_offline(&json!([
            itinerary_json("srv-1", "Porto"),
            itinerary_json("srv-2", "Kyoto")
        ]))
        .await;
    cache
        .add_pending_sync(ActionKind::Update, "srv-1", Some(json!({ "title": "Porto 2" })))
        .await
        .unwrap();
    cache
        .add_pending_sync(ActionKind::Delete, "srv-2", None)
        .await
        .unwrap();

    let report = cache.sync_pending_actions().await;
    assert_eq!(report.attempted, 2);
    assert_eq!(report.synced, 2);
    assert!(report.failed.is_empty());
    assert!(cache.get_pending_sync().await.is_empty());

    assert_eq!(api.updated.lock().unwrap()[0].0, "srv-1");
    assert_eq!(*api.deleted.lock().unwrap(), vec!["srv-2".to_string()]);
    assert_eq!(titles(&cache.get_offline_itineraries().await), vec!["Porto 2"]);
}

#[tokio::test]
async fn test_sync_keeps_only_failed_actions() {
    let api = MockApi::new();
    api.fail_mutation("srv-2", 500);
    let (_dir, cache) = create_test_cache(api.clone()).await;

    cache
        .add_pending_sync(ActionKind::Delete, "srv-1", None)
        .await
        .unwrap();
    let second = cache
        .add_pending_sync(ActionKind::Delete, "srv-2", None)
        .await
        .unwrap();

    let report = cache.sync_pending_actions().await;
    assert_eq!(report.synced, 1);
    assert_eq!(report.failed, vec![second.id.clone()]);
    assert_eq!(cache.get_pending_sync().await, vec![second]);
}

#[tokio::test]
async fn test_sync_stops_on_unauthorized() {
    let api = MockApi::new();
    api.fail_mutation("srv-1", 401);
    let (_dir, cache) = create_test_cache(api.clone()).await;

    cache
        .add_pending_sync(ActionKind::Delete, "srv-1", None)
        .await
        .unwrap();
    cache
        .add_pending_sync(ActionKind::Delete, "srv-2", None)
        .await
        .unwrap();

    let report = cache.sync_pending_actions().await;
    assert_eq!(report.attempted, 1);
    assert_eq!(report.failed.len(), 2);
    assert_eq!(cache.get_pending_sync().await.len(), 2);
    assert!(api.deleted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_treats_missing_record_as_deleted() {
    let api = MockApi::new();
    api.fail_mutation("srv-gone", 404);
    let (_dir, cache) = create_test_cache(api).await;

    cache
        .add_pending_sync(ActionKind::Delete, "srv-gone", None)
        .await
        .unwrap();

    let report = cache.sync_pending_actions().await;
    assert_eq!(report.synced, 1);
    assert!(cache.get_pending_sync().await.is_empty());
}

#[tokio::test]
async fn test_offline_create_is_replayed_with_server_id() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .save_itineraries_offline(&json!([itinerary_json("srv-0", "Porto")]))
        .await;
    api.set_online(false);

    let outcome = cache
        .create_itinerary(json!({ "title": "Kyoto", "status": "rascunho" }))
        .await
        .unwrap();
    let MutationOutcome::Queued(action) = outcome else {
        panic!("expected the create to be queued");
    };
    assert_eq!(action.kind, ActionKind::Create);
    assert!(action.record_id.starts_with("local-"));

    let cached = cache.get_offline_itineraries().await;
    assert_eq!(cached[1].id(), action.record_id);
    assert_eq!(cached[1].status(), Some(ItineraryStatus::Draft));

    cache
        .update_itinerary(&action.record_id, json!({ "title": "Kyoto in spring" }))
        .await
        .unwrap();
    assert_eq!(cache.get_pending_sync().await.len(), 2);

    api.set_online(true);
    let report = cache.sync_pending_actions().await;
    assert_eq!(report.synced, 2);
    assert!(cache.get_pending_sync().await.is_empty());

    let updated = api.updated.lock().unwrap().clone();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].0, "srv-1");

    let ids: Vec<String> = cache
        .get_offline_itineraries()
        .await
        .iter()
        .map(|i| i.id().to_string())
        .collect();
    assert_eq!(ids, vec!["srv-0", "srv-1"]);
}

#[tokio::test]
async fn test_online_create_is_applied_immediately() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;

    let outcome = cache
        .create_itinerary(json!({ "title": "Lima" }))
        .await
        .unwrap();
    assert!(!outcome.is_queued());
    assert!(cache.get_pending_sync().await.is_empty());
    assert_eq!(titles(&cache.get_offline_itineraries().await), vec!["Lima"]);
    assert_eq!(api.created.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_update_is_not_queued() {
    let api = MockApi::new();
    api.fail_mutation("srv-1", 422);
    let (_dir, cache) = create_test_cache(api).await;

    let result = cache
        .update_itinerary("srv-1", json!({ "title": "" }))
        .await;
    assert!(matches!(result, Err(WayfarerError::Http { status: 422, .. })));
    assert!(cache.get_pending_sync().await.is_empty());
}

#[tokio::test]
async fn test_unauthorized_delete_is_not_queued() {
    let api = MockApi::new();
    api.fail_mutation("srv-1", 401);
    let (_dir, cache) = create_test_cache(api).await;

    let result = cache.delete_itinerary("srv-1").await;
    assert!(matches!(result, Err(WayfarerError::Unauthorized)));
    assert!(cache.get_pending_sync().await.is_empty());
}

#[tokio::test]
async fn test_server_error_update_is_queued_and_patched_locally() {
    let api = MockApi::new();
    api.fail_mutation("srv-1", 503);
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .save_itineraries_offline(&json!([{
            "_id": "srv-1", "title": "Porto", "days": [{ "day": 1 }]
        }]))
        .await;

    let outcome = cache
        .update_itinerary("srv-1", json!({ "status": "confirmado" }))
        .await
        .unwrap();
    assert!(outcome.is_queued());

    let cached = cache.get_offline_itineraries().await;
    assert_eq!(cached[0].status(), Some(ItineraryStatus::Confirmed));
    assert_eq!(cached[0].get("days"), Some(&json!([{ "day": 1 }])));

    api.heal_mutation("srv-1");
    assert_eq!(cache.sync_pending_actions().await.synced, 1);
}

#[tokio::test]
async fn test_offline_delete_removes_from_snapshot() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .save_itineraries_offline(&json!([
            itinerary_json("srv-1", "Porto"),
            itinerary_json("srv-2", "Kyoto")
        ]))
        .await;
    api.set_online(false);

    assert!(cache.delete_itinerary("srv-1").await.unwrap().is_queued());
    assert_eq!(titles(&cache.get_offline_itineraries().await), vec!["Kyoto"]);
}

#[tokio::test]
async fn test_empty_id_is_rejected() {
    let (_dir, cache) = create_test_cache(MockApi::new()).await;
    assert!(matches!(
        cache.delete_itinerary("  ").await,
        Err(WayfarerError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_cache_info_and_clear() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .save_itineraries_offline(&json!([
            itinerary_json("1", "Porto"),
            itinerary_json("2", "Kyoto")
        ]))
        .await;
    cache
        .add_pending_sync(ActionKind::Delete, "1", None)
        .await
        .unwrap();
    api.set_online(false);

    let info = cache.get_cache_info().await;
    assert_eq!(info.itineraries_count, 2);
    assert_eq!(info.pending_sync_count, 1);
    assert!(!info.is_online);

    cache.clear_offline_cache().await;
    let info = cache.get_cache_info().await;
    assert_eq!(info.itineraries_count, 0);
    assert_eq!(info.pending_sync_count, 0);
}

#[tokio::test]
async fn test_filtered_itineraries() {
    let (_dir, cache) = create_test_cache(MockApi::new()).await;
    cache
        .save_itineraries_offline(&json!([
            { "_id": "1", "title": "Porto", "status": "confirmado",
              "destination": { "city": "Porto", "country": "Portugal" },
              "createdAt": "2025-01-01T00:00:00Z" },
            { "_id": "2", "title": "Lisbon", "status": "rascunho",
              "destination": { "city": "Lisbon", "country": "Portugal" },
              "createdAt": "2025-02-01T00:00:00Z" },
            { "_id": "3", "title": "Kyoto", "status": "confirmado",
              "destination": { "city": "Kyoto", "country": "Japan" },
              "createdAt": "2025-03-01T00:00:00Z" }
        ]))
        .await;

    let portugal = cache
        .filtered_itineraries(&ItineraryFilter {
            query: Some("portugal".to_string()),
            status: None,
            sort: SortOrder::Oldest,
        })
        .await;
    assert_eq!(titles(&portugal), vec!["Porto", "Lisbon"]);

    let confirmed = cache
        .filtered_itineraries(&ItineraryFilter {
            query: None,
            status: Some(ItineraryStatus::Confirmed),
            sort: SortOrder::Recent,
        })
        .await;
    assert_eq!(titles(&confirmed), vec!["Kyoto", "Porto"]);
}

#[tokio::test]
async fn test_auto_sync_replays_until_shutdown() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .add_pending_sync(ActionKind::Delete, "srv-1", None)
        .await
        .unwrap();

    let mut reports = 0;
    let mut ticks = 0;
    cache
        .run_auto_sync(
            Duration::from_millis(20),
            tokio::time::sleep(Duration::from_millis(300)),
            |_info, report| {
                ticks += 1;
                if report.is_some() {
                    reports += 1;
                }
            },
        )
        .await;

    assert!(ticks >= 1);
    assert_eq!(reports, 1);
    assert!(cache.get_pending_sync().await.is_empty());
    assert_eq!(*api.deleted.lock().unwrap(), vec!["srv-1".to_string()]);
}

#[tokio::test]
async fn test_auto_sync_with_zero_period_still_ticks() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;

    let mut ticks = 0;
    cache
        .run_auto_sync(
            Duration::ZERO,
            tokio::time::sleep(Duration::from_millis(1500)),
            |_info, _report| ticks += 1,
        )
        .await;

    assert!((1..=2).contains(&ticks));
}

#[tokio::test]
async fn test_online_read_keeps_server_records_verbatim() {
    let api = MockApi::new();
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .save_itineraries_offline(&json!([itinerary_json("old", "Old")]))
        .await;

    let record = json!({
        "_id": "n1",
        "id": "n1",
        "title": null,
        "destination": { "city": "Lisboa", "country": "PT", "placeId": "abc" },
        "budget": { "level": "medio", "estimatedTotal": 1000, "lastUpdated": "2025-01-01" }
    });
    api.set_list_body(json!({ "itineraries": [record.clone()] }));

    let outcome = cache.load_itineraries(&ListItineraries::default()).await;
    assert_eq!(outcome.source, DataSource::Network);
    assert_eq!(outcome.notice, None);
    assert_eq!(outcome.itineraries[0].id(), "n1");

    let cached = cache.get_offline_itineraries().await;
    assert_eq!(cached.len(), 1);
    assert_eq!(serde_json::to_value(&cached[0]).unwrap(), record);
}

#[tokio::test]
async fn test_concurrent_loads_do_not_overlap() {
    let api = MockApi::new();
    api.set_list_body(json!([itinerary_json("1", "Porto")]));
    api.set_latency(Duration::from_millis(100));
    let (_dir, cache) = create_test_cache(api.clone()).await;

    let params = ListItineraries::default();
    let (first, second) = tokio::join!(
        cache.load_itineraries(&params),
        cache.load_itineraries(&params)
    );

    assert_eq!(first.source, DataSource::Network);
    assert_eq!(second.source, DataSource::Network);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
    assert_eq!(api.peak_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_syncs_replay_each_action_once() {
    let api = MockApi::new();
    api.set_latency(Duration::from_millis(50));
    let (_dir, cache) = create_test_cache(api.clone()).await;
    cache
        .add_pending_sync(ActionKind::Delete, "srv-1", None)
        .await
        .unwrap();
    cache
        .add_pending_sync(ActionKind::Delete, "srv-2", None)
        .await
        .unwrap();

    let (first, second) = tokio::join!(cache.sync_pending_actions(), cache.sync_pending_actions());

    assert_eq!(first.synced + second.synced, 2);
    assert_eq!(
        *api.deleted.lock().unwrap(),
        vec!["srv-1".to_string(), "srv-2".to_string()]
    );
    assert_eq!(api.peak_in_flight.load(Ordering::SeqCst), 1);
    assert!(cache.get_pending_sync().await.is_empty());
}
