use tapiceria_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 1).await?;
    run_migrations(&pool).await?;

    let username = std::env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let admin_id = ensure_admin(&pool, &username, &password).await?;
    seed_materiales(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, username: &str, password: &str) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO empleados (id, nombre, username, password_hash, rol, activo)
        VALUES ($1, 'Administrador', $2, $3, 'admin', TRUE)
        ON CONFLICT (username) DO UPDATE SET rol = EXCLUDED.rol, activo = TRUE
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn seed_materiales(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let materiales = vec![
        ("TEL-LINO-01", "Tela de lino natural", "metro", 185.0),
        ("TEL-TERC-02", "Terciopelo azul marino", "metro", 260.0),
        ("ESP-HD-25", "Espuma alta densidad 25 kg", "plancha", 540.0),
        ("RES-ZIG-01", "Resorte zigzag", "metro", 32.5),
        ("GRA-10", "Grapas 10 mm", "caja", 48.0),
    ];

    for (codigo, nombre, unidad, costo) in materiales {
        sqlx::query(
            r#"
            INSERT INTO materiales (id, codigo, nombre, unidad_medida, costo_unitario)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(codigo)
        .bind(nombre)
        .bind(unidad)
        .bind(costo)
        .execute(pool)
        .await?;
    }

    println!("Seeded materials");
    Ok(())
}
