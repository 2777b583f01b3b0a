//! Redis backend tests. They run only when `REDIS_URL` points at a server.

use chrono::NaiveDate;
use link_stats::domain::entities::{ClickIncrement, DailyClickStat, DeviceType};
use link_stats::domain::repositories::StatsRepository;
use link_stats::infrastructure::persistence::RedisStatsRepository;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

/// Repository under a key prefix unique to this test run.
async fn test_repo(name: &str) -> Option<(RedisStatsRepository, ConnectionManager, String)> {
    let Ok(url) = std::env::var("REDIS_URL") else {
        eprintln!("REDIS_URL not set, skipping {name}");
        return None;
    };

    let client = redis::Client::open(url).unwrap();
    let manager = ConnectionManager::new(client).await.unwrap();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let prefix = format!("test:{}:{}:{}:", name, std::process::id(), nanos);

    Some((
        RedisStatsRepository::with_manager(manager.clone(), prefix.clone()),
        manager,
        prefix,
    ))
}

async fn cleanup(mut conn: ConnectionManager, prefix: &str) {
    let keys: Vec<String> = redis::cmd("KEYS")
        .arg(format!("{}*", prefix))
        .query_async(&mut conn)
        .await
        .unwrap();
    if !keys.is_empty() {
        redis::cmd("DEL")
            .arg(keys)
            .query_async::<()>(&mut conn)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_unknown_link_is_none() {
    let Some((repo, conn, prefix)) = test_repo("unknown").await else {
        return;
    };

    let result = repo.find_by_short_url("missing", day(1)).await;

    assert!(matches!(result, Ok(None)));
    cleanup(conn, &prefix).await;
}

#[tokio::test]
async fn test_increment_and_read() {
    let Some((repo, conn, prefix)) = test_repo("increment").await else {
        return;
    };

    for (device, d) in [
        (DeviceType::Desktop, 3),
        (DeviceType::Mobile, 10),
        (DeviceType::Mobile, 10),
        (DeviceType::Tablet, 12),
    ] {
        repo.increment(ClickIncrement::new("my-url", device, day(d)))
            .await
            .unwrap();
    }

    let stats = repo
        .find_by_short_url("my-url", day(5))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stats.total_clicks, 4);
    assert_eq!(stats.device_clicks.desktop, 1);
    assert_eq!(stats.device_clicks.mobile, 2);
    assert_eq!(stats.device_clicks.tablet, 1);
    assert_eq!(stats.device_clicks.other, 0);
    assert_eq!(
        stats.daily_clicks,
        vec![DailyClickStat::new(day(10), 2), DailyClickStat::new(day(12), 1)]
    );

    cleanup(conn, &prefix).await;
}

#[tokio::test]
async fn test_similar_identifiers_are_independent() {
    let Some((repo, conn, prefix)) = test_repo("independent").await else {
        return;
    };

    repo.increment(ClickIncrement::new("abc", DeviceType::Desktop, day(1)))
        .await
        .unwrap();

    assert!(
        repo.find_by_short_url("abc:daily", day(1))
            .await
            .unwrap()
            .is_none()
    );

    repo.increment(ClickIncrement::new("abc:daily", DeviceType::Other, day(2)))
        .await
        .unwrap();

    let abc = repo.find_by_short_url("abc", day(1)).await.unwrap().unwrap();
    assert_eq!(abc.total_clicks, 1);
    assert_eq!(abc.daily_clicks, vec![DailyClickStat::new(day(1), 1)]);

    cleanup(conn, &prefix).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments() {
    let Some((repo, conn, prefix)) = test_repo("concurrent").await else {
        return;
    };
    let repo = Arc::new(repo);

    let mut tasks = Vec::new();
    for i in 0..200 {
        let repo = repo.clone();
        let device = DeviceType::ALL[i % DeviceType::ALL.len()];
        tasks.push(tokio::spawn(async move {
            repo.increment(ClickIncrement::new("contended", device, day(20)))
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let stats = repo
        .find_by_short_url("contended", day(1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stats.total_clicks, 200);
    assert_eq!(stats.device_clicks.total(), 200);
    assert_eq!(stats.daily_total(), 200);
    for device in DeviceType::ALL {
        assert_eq!(stats.device_clicks.get(device), 50);
    }

    cleanup(conn, &prefix).await;
}

#[tokio::test]
async fn test_health_check() {
    let Some((repo, conn, prefix)) = test_repo("health").await else {
        return;
    };

    assert!(repo.health_check().await);
    assert_eq!(repo.backend_name(), "redis");

    cleanup(conn, &prefix).await;
}
