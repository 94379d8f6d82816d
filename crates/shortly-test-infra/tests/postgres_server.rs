use shortly_test_infra::postgres::{PostgresConfig, PostgresServer};

#[tokio::test]
async fn connect_returns_a_usable_pool() {
    let postgres = PostgresServer::new(PostgresConfig::builder().max_connections(2).build())
        .await
        .expect("start postgres");

    let pool = postgres.connect().await.expect("connect postgres");
    let one: i32 = sqlx::query_scalar("SELECT 1")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(one, 1);
    assert_eq!(pool.options().get_max_connections(), 2);
}

#[tokio::test]
async fn database_url_uses_configured_credentials() {
    let postgres = PostgresServer::new(
        PostgresConfig::builder()
            .database("links".to_string())
            .username("reader".to_string())
            .password("secret".to_string())
            .build(),
    )
    .await
    .expect("start postgres");

    let url = postgres.database_url().await.unwrap();
    assert!(url.starts_with("postgres://reader:secret@"));
    assert!(url.ends_with("/links"));

    let pool = postgres.connect().await.expect("connect postgres");
    let current: String = sqlx::query_scalar("SELECT current_database()")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(current, "links");
}
