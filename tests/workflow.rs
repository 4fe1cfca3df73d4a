use sea_orm::{ConnectionTrait, Statement};
use tapiceria_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        auth::LoginRequest,
        clientes::CreateClienteRequest,
        cotizaciones::{CreateCotizacionRequest, UpdateCotizacionRequest},
        empleados::{CreateEmpleadoRequest, UpdateEmpleadoRequest},
        materiales::{CreateMaterialRequest, UpdateMaterialRequest},
        peticiones::CreatePeticionRequest,
        reports::IngresosQuery,
        trabajos::{CreateTrabajoRequest, UpdateTrabajoRequest},
    },
    enums::{EstadoCotizacion, EstadoPeticion, EstadoTrabajo, Role},
    error::AppError,
    middleware::auth::AuthUser,
    models::{Cliente, Cotizacion},
    routes::params::MaterialListQuery,
    services::{
        auth_service, cliente_service, cotizacion_service, empleado_service, material_service,
        peticion_material_service, report_service, trabajo_service,
    },
    state::AppState,
};
use uuid::Uuid;

// These flows run against a real Postgres and are skipped without one.
async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run workflow tests.");
            return Ok(None);
        }
    };
    let pool = create_pool(&database_url, 5).await?;
    run_migrations(&pool).await?;
    let config = AppConfig {
        database_url,
        database_max_connections: 5,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "workflow-secret".into(),
        jwt_expiration_hours: 1,
    };
    Ok(Some(AppState::new(pool, config)))
}

fn staff(role: Role) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        username: format!("{role:?}").to_lowercase(),
        role,
    }
}

fn suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

async fn register(state: &AppState, tag: &str) -> anyhow::Result<Cliente> {
    let resp = auth_service::register_cliente(
        state,
        CreateClienteRequest {
            nombre: Some("Ana".into()),
            contacto: Some(format!("555-{tag}")),
            username: Some(format!("ana-{tag}")),
            password: Some("x".into()),
        },
    )
    .await?;
    Ok(resp.data.expect("client"))
}

async fn quote(state: &AppState, cliente_id: Uuid, total: f64) -> anyhow::Result<Cotizacion> {
    let resp = cotizacion_service::create_cotizacion(
        state,
        &staff(Role::Empleado),
        CreateCotizacionRequest {
            cliente_id: Some(cliente_id),
            tipo_producto: Some("Sofá de tres plazas".into()),
            total_estimado: Some(total),
            ..Default::default()
        },
    )
    .await?;
    Ok(resp.data.expect("quote"))
}

#[tokio::test]
async fn client_registration_and_login() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let tag = suffix();
    let cliente = register(&state, &tag).await?;

    let (stored,): (String,) = sqlx::query_as("SELECT password_hash FROM clientes WHERE id = $1")
        .bind(cliente.id)
        .fetch_one(&state.pool)
        .await?;
    assert_ne!(stored, "x");

    let login = auth_service::login_cliente(
        &state,
        LoginRequest {
            username: Some(format!("ana-{tag}")),
            password: Some("x".into()),
        },
    )
    .await?;
    assert!(!login.data.expect("token").token.is_empty());

    let wrong_password = auth_service::login_cliente(
        &state,
        LoginRequest {
            username: Some(format!("ana-{tag}")),
            password: Some("y".into()),
        },
    )
    .await
    .unwrap_err();
    let unknown_user = auth_service::login_cliente(
        &state,
        LoginRequest {
            username: Some(format!("nobody-{tag}")),
            password: Some("x".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(wrong_password, AppError::Unauthorized(_)));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());

    let duplicate = auth_service::register_cliente(
        &state,
        CreateClienteRequest {
            nombre: Some("Otra".into()),
            contacto: Some(format!("555-otra-{tag}")),
            username: Some(format!("ana-{tag}")),
            password: Some("z".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(duplicate, AppError::Conflict(_)));

    let first = cliente_service::get_cliente(&state, &staff(Role::Empleado), cliente.id)
        .await?
        .data
        .expect("client");
    assert_eq!(first.nombre, "Ana");
    assert_eq!(first.contacto, format!("555-{tag}"));
    auth_service::login_cliente(
        &state,
        LoginRequest {
            username: Some(format!("ana-{tag}")),
            password: Some("x".into()),
        },
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn deposit_rules_on_quotes() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let cliente = register(&state, &suffix()).await?;
    let cotizacion = quote(&state, cliente.id, 1000.0).await?;
    assert_eq!(cotizacion.anticipo_requerido, 500.0);
    assert_eq!(cotizacion.estado, EstadoCotizacion::PendienteAnticipo);

    let employee = staff(Role::Empleado);
    let err = cotizacion_service::update_cotizacion(
        &state,
        &employee,
        cotizacion.id,
        UpdateCotizacionRequest {
            monto_anticipo_pagado: Some(600.0),
            notas: Some(Some("no debería guardarse".into())),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let unchanged = cotizacion_service::get_cotizacion(&state, &employee, cotizacion.id)
        .await?
        .data
        .expect("quote");
    assert_eq!(unchanged.monto_anticipo_pagado, 0.0);
    assert_eq!(unchanged.notas, None);

    let paid = cotizacion_service::update_cotizacion(
        &state,
        &employee,
        cotizacion.id,
        UpdateCotizacionRequest {
            monto_anticipo_pagado: Some(500.0),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("quote");
    assert_eq!(paid.estado, EstadoCotizacion::AnticipoPagadoAgendado);
    assert!(paid.fecha_anticipo_pagado.is_some());

    let noop = cotizacion_service::update_cotizacion(
        &state,
        &employee,
        cotizacion.id,
        UpdateCotizacionRequest::default(),
    )
    .await?;
    assert_eq!(noop.message, "No changes applied");
    assert_eq!(noop.data.expect("quote").updated_at, paid.updated_at);

    let outsider = AuthUser {
        user_id: Uuid::new_v4(),
        username: "otro".into(),
        role: Role::Cliente,
    };
    let err = cotizacion_service::get_cotizacion(&state, &outsider, cotizacion.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    Ok(())
}

#[tokio::test]
async fn delivering_a_job_completes_its_quote() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let employee = staff(Role::Empleado);
    let cliente = register(&state, &suffix()).await?;
    let cotizacion = quote(&state, cliente.id, 2400.0).await?;

    let trabajo = trabajo_service::create_trabajo(
        &state,
        &employee,
        CreateTrabajoRequest {
            cotizacion_id: Some(cotizacion.id),
            fecha_inicio_estimada: Some("2026-05-04".into()),
            fecha_fin_estimada: Some("cuando se pueda".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("job");
    assert_eq!(trabajo.estado, EstadoTrabajo::Pendiente);
    assert!(trabajo.fecha_inicio_estimada.is_some());
    assert_eq!(trabajo.fecha_fin_estimada, None);

    let second = trabajo_service::create_trabajo(
        &state,
        &employee,
        CreateTrabajoRequest {
            cotizacion_id: Some(cotizacion.id),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(second, AppError::Conflict(_)));

    let delivered = trabajo_service::update_trabajo(
        &state,
        &employee,
        trabajo.id,
        UpdateTrabajoRequest {
            estado: Some(EstadoTrabajo::Entregado),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("job");
    assert_eq!(delivered.estado, EstadoTrabajo::Entregado);
    assert!(delivered.fecha_fin_real.is_some());

    let completed = cotizacion_service::get_cotizacion(&state, &employee, cotizacion.id)
        .await?
        .data
        .expect("quote");
    assert_eq!(completed.estado, EstadoCotizacion::Completada);
    Ok(())
}

#[tokio::test]
async fn cancelled_quotes_survive_delivery() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let employee = staff(Role::Empleado);
    let cliente = register(&state, &suffix()).await?;
    let cotizacion = quote(&state, cliente.id, 900.0).await?;
    let trabajo = trabajo_service::create_trabajo(
        &state,
        &employee,
        CreateTrabajoRequest {
            cotizacion_id: Some(cotizacion.id),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("job");

    cotizacion_service::update_cotizacion(
        &state,
        &employee,
        cotizacion.id,
        UpdateCotizacionRequest {
            estado: Some(EstadoCotizacion::Cancelada),
            ..Default::default()
        },
    )
    .await?;

    let resp = trabajo_service::update_trabajo(
        &state,
        &employee,
        trabajo.id,
        UpdateTrabajoRequest {
            estado: Some(EstadoTrabajo::Entregado),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(resp.message, "Job updated");

    let after = cotizacion_service::get_cotizacion(&state, &employee, cotizacion.id)
        .await?
        .data
        .expect("quote");
    assert_eq!(after.estado, EstadoCotizacion::Cancelada);
    Ok(())
}

#[tokio::test]
async fn material_requests_need_a_reference() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let employee = staff(Role::Empleado);
    let tag = suffix();
    let material = material_service::create_material(
        &state,
        &employee,
        CreateMaterialRequest {
            codigo: Some(format!("TEL-{tag}")),
            nombre: Some(format!("Tela {tag}")),
            unidad_medida: Some("metro".into()),
            costo_unitario: Some(120.0),
            disponible: None,
        },
    )
    .await?
    .data
    .expect("material");
    let codigo = material.codigo.clone().expect("code");

    let err = peticion_material_service::create_peticion(
        &state,
        &employee,
        CreatePeticionRequest {
            material_codigo: Some(codigo.clone()),
            cantidad_requerida: Some(3.0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let cliente = register(&state, &tag).await?;
    let cotizacion = quote(&state, cliente.id, 1500.0).await?;
    let peticion = peticion_material_service::create_peticion(
        &state,
        &employee,
        CreatePeticionRequest {
            cotizacion_id: Some(cotizacion.id),
            material_codigo: Some(codigo),
            cantidad_requerida: Some(3.0),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("request");
    assert_eq!(peticion.cotizacion_id, Some(cotizacion.id));
    assert!(!peticion.notificado_gerente);

    let duplicate = material_service::create_material(
        &state,
        &employee,
        CreateMaterialRequest {
            codigo: Some(format!("OTRO-{tag}")),
            nombre: Some(format!("Tela {tag}")),
            unidad_medida: Some("metro".into()),
            costo_unitario: Some(99.0),
            disponible: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(duplicate, AppError::Conflict(_)));
    let first = material_service::get_material(&state, material.id)
        .await?
        .data
        .expect("material");
    assert_eq!(first.costo_unitario, 120.0);
    assert_eq!(first.codigo.as_deref(), Some(format!("TEL-{tag}").as_str()));

    let renamed = material_service::update_material(
        &state,
        &employee,
        material.id,
        UpdateMaterialRequest::default(),
    )
    .await?;
    assert_eq!(renamed.message, "No changes applied");
    Ok(())
}

#[tokio::test]
async fn last_page_holds_the_remainder() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let employee = staff(Role::Gerente);
    let tag = suffix();
    for n in 0..5 {
        material_service::create_material(
            &state,
            &employee,
            CreateMaterialRequest {
                codigo: Some(format!("PG-{tag}-{n}")),
                nombre: Some(format!("Hilo {tag} {n}")),
                unidad_medida: Some("carrete".into()),
                costo_unitario: Some(10.0),
                disponible: None,
            },
        )
        .await?;
    }

    let resp = material_service::list_materiales(
        &state,
        MaterialListQuery {
            page: Some(3),
            per_page: Some(2),
            q: Some(format!("PG-{tag}")),
            disponible: None,
        },
    )
    .await?;
    let meta = resp.meta.expect("meta");
    assert_eq!(resp.data.expect("materials").items.len(), 1);
    assert_eq!(meta.total, Some(5));
    assert_eq!(meta.has_next_page, Some(false));

    let beyond = material_service::list_materiales(
        &state,
        MaterialListQuery {
            page: Some(u64::MAX),
            per_page: Some(100),
            q: Some(format!("PG-{tag}")),
            disponible: None,
        },
    )
    .await?;
    assert!(beyond.data.expect("materials").items.is_empty());
    assert_eq!(beyond.meta.expect("meta").total, Some(5));

    // `_` is a literal character in searches, not a single-char wildcard.
    let literal = material_service::list_materiales(
        &state,
        MaterialListQuery {
            q: Some(format!("PG_{tag}")),
            ..Default::default()
        },
    )
    .await?;
    assert!(literal.data.expect("materials").items.is_empty());

    state
        .orm
        .execute(Statement::from_sql_and_values(
            state.orm.get_database_backend(),
            "DELETE FROM materiales WHERE codigo LIKE $1",
            [format!("PG-{tag}-%").into()],
        ))
        .await?;
    Ok(())
}

async fn hire(
    state: &AppState,
    by: &AuthUser,
    username: &str,
    rol: Role,
) -> Result<tapiceria_api::models::Empleado, AppError> {
    let resp = empleado_service::create_empleado(
        state,
        by,
        CreateEmpleadoRequest {
            nombre: Some("Luis".into()),
            contacto: Some(format!("contacto-{username}")),
            username: Some(username.into()),
            password: Some("original".into()),
            rol: Some(rol),
            activo: None,
        },
    )
    .await?;
    Ok(resp.data.expect("employee"))
}

#[tokio::test]
async fn managers_cannot_touch_admin_accounts() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = staff(Role::Admin);
    let gerente = staff(Role::Gerente);
    let tag = suffix();
    let root = hire(&state, &admin, &format!("root-{tag}"), Role::Admin).await?;

    let err = empleado_service::update_empleado(
        &state,
        &gerente,
        root.id,
        UpdateEmpleadoRequest {
            password: Some("cambiada".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = empleado_service::update_empleado(
        &state,
        &gerente,
        root.id,
        UpdateEmpleadoRequest {
            activo: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let rejected = auth_service::login_empleado(
        &state,
        LoginRequest {
            username: Some(format!("root-{tag}")),
            password: Some("cambiada".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(rejected, AppError::Unauthorized(_)));
    let login = auth_service::login_empleado(
        &state,
        LoginRequest {
            username: Some(format!("root-{tag}")),
            password: Some("original".into()),
        },
    )
    .await?;
    assert_eq!(login.data.expect("token").user.rol, Role::Admin);

    // A manager still edits ordinary staff, but cannot promote them.
    let worker = hire(&state, &gerente, &format!("worker-{tag}"), Role::Empleado).await?;
    let err = empleado_service::update_empleado(
        &state,
        &gerente,
        worker.id,
        UpdateEmpleadoRequest {
            rol: Some(Role::Admin),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    let renamed = empleado_service::update_empleado(
        &state,
        &gerente,
        worker.id,
        UpdateEmpleadoRequest {
            nombre: Some("Luis Alberto".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("employee");
    assert_eq!(renamed.nombre, "Luis Alberto");

    for id in [root.id, worker.id] {
        empleado_service::delete_empleado(&state, &admin, id).await?;
    }
    Ok(())
}

#[tokio::test]
async fn duplicate_employees_leave_the_first_intact() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let gerente = staff(Role::Gerente);
    let tag = suffix();
    let first = hire(&state, &gerente, &format!("emp-{tag}"), Role::Empleado).await?;

    let err = empleado_service::create_empleado(
        &state,
        &gerente,
        CreateEmpleadoRequest {
            nombre: Some("Impostor".into()),
            username: Some(format!("emp-{tag}")),
            password: Some("otra".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("username")));

    let err = empleado_service::create_empleado(
        &state,
        &gerente,
        CreateEmpleadoRequest {
            nombre: Some("Impostor".into()),
            contacto: Some(format!("contacto-emp-{tag}")),
            username: Some(format!("emp2-{tag}")),
            password: Some("otra".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("contacto")));

    let stored = empleado_service::get_empleado(&state, &gerente, first.id)
        .await?
        .data
        .expect("employee");
    assert_eq!(stored.nombre, "Luis");
    assert_eq!(stored.rol, Role::Empleado);
    assert!(stored.activo);
    auth_service::login_empleado(
        &state,
        LoginRequest {
            username: Some(format!("emp-{tag}")),
            password: Some("original".into()),
        },
    )
    .await?;

    empleado_service::delete_empleado(&state, &staff(Role::Admin), first.id).await?;
    Ok(())
}

#[tokio::test]
async fn failed_quote_completion_keeps_the_delivery() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let employee = staff(Role::Empleado);
    let tag = suffix();
    let cliente = register(&state, &tag).await?;
    let cotizacion = quote(&state, cliente.id, 1800.0).await?;
    let trabajo = trabajo_service::create_trabajo(
        &state,
        &employee,
        CreateTrabajoRequest {
            cotizacion_id: Some(cotizacion.id),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("job");

    // Every write to this one quote now fails inside Postgres.
    let guard = format!("lock_quote_{tag}");
    sqlx::query(&format!(
        "CREATE FUNCTION {guard}() RETURNS trigger LANGUAGE plpgsql AS $$ \
         BEGIN RAISE EXCEPTION 'quote is locked'; END $$"
    ))
    .execute(&state.pool)
    .await?;
    sqlx::query(&format!(
        "CREATE TRIGGER {guard} BEFORE UPDATE ON cotizaciones FOR EACH ROW \
         WHEN (OLD.id = '{}'::uuid) EXECUTE FUNCTION {guard}()",
        cotizacion.id
    ))
    .execute(&state.pool)
    .await?;

    let delivered = trabajo_service::update_trabajo(
        &state,
        &employee,
        trabajo.id,
        UpdateTrabajoRequest {
            estado: Some(EstadoTrabajo::Entregado),
            ..Default::default()
        },
    )
    .await;

    sqlx::query(&format!("DROP TRIGGER {guard} ON cotizaciones"))
        .execute(&state.pool)
        .await?;
    sqlx::query(&format!("DROP FUNCTION {guard}()"))
        .execute(&state.pool)
        .await?;

    let delivered = delivered?;
    assert_eq!(delivered.message, "Job updated");
    let job = delivered.data.expect("job");
    assert_eq!(job.estado, EstadoTrabajo::Entregado);
    assert!(job.fecha_fin_real.is_some());

    let after = cotizacion_service::get_cotizacion(&state, &employee, cotizacion.id)
        .await?
        .data
        .expect("quote");
    assert_eq!(after.estado, EstadoCotizacion::PendienteAnticipo);
    Ok(())
}

#[tokio::test]
async fn reports_reflect_pending_purchases() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let employee = staff(Role::Empleado);
    let gerente = staff(Role::Gerente);
    let tag = suffix();
    let codigo = format!("REP-{tag}");
    material_service::create_material(
        &state,
        &employee,
        CreateMaterialRequest {
            codigo: Some(codigo.clone()),
            nombre: Some(format!("Espuma {tag}")),
            unidad_medida: Some("placa".into()),
            costo_unitario: Some(45.0),
            disponible: None,
        },
    )
    .await?;
    let cliente = register(&state, &tag).await?;
    let cotizacion = quote(&state, cliente.id, 700.0).await?;

    let mut ids = Vec::new();
    for (cantidad, estado) in [
        (2.0, None),
        (5.0, None),
        (1.0, Some(EstadoPeticion::Comprado)),
    ] {
        let peticion = peticion_material_service::create_peticion(
            &state,
            &employee,
            CreatePeticionRequest {
                cotizacion_id: Some(cotizacion.id),
                material_codigo: Some(codigo.clone()),
                cantidad_requerida: Some(cantidad),
                estado,
                ..Default::default()
            },
        )
        .await?
        .data
        .expect("request");
        ids.push(peticion.id);
    }
    // The second request becomes the oldest one.
    sqlx::query(
        "UPDATE peticiones_material SET created_at = NOW() - INTERVAL '2 days' WHERE id = $1",
    )
    .bind(ids[1])
    .execute(&state.pool)
    .await?;

    let pending: Vec<_> = report_service::peticiones_pendientes(&state, &gerente)
        .await?
        .data
        .expect("requests")
        .into_iter()
        .filter(|p| p.material_codigo == codigo)
        .collect();
    assert_eq!(
        pending.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![ids[1], ids[0]]
    );
    assert_eq!(pending[0].material_nombre, format!("Espuma {tag}"));
    assert_eq!(pending[0].unidad_medida, "placa");
    assert_eq!(pending[0].costo_unitario, 45.0);

    let dashboard = report_service::dashboard(&state, &gerente)
        .await?
        .data
        .expect("dashboard");
    let ours = dashboard
        .peticiones_pendientes
        .iter()
        .filter(|p| p.material_codigo == codigo)
        .count();
    assert_eq!(ours, 2);
    assert!(dashboard
        .cotizaciones_por_estado
        .iter()
        .any(|row| row.estado == "Pendiente de Anticipo" && row.cantidad >= 1));
    Ok(())
}

#[tokio::test]
async fn monthly_revenue_honours_the_status_filter() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let employee = staff(Role::Empleado);
    let gerente = staff(Role::Gerente);
    // A year nothing else writes to.
    let year = 1200 + (Uuid::new_v4().as_u128() % 700) as i32;
    let cliente = register(&state, &suffix()).await?;
    let open = quote(&state, cliente.id, 1000.0).await?;
    let cancelled = quote(&state, cliente.id, 300.0).await?;
    cotizacion_service::update_cotizacion(
        &state,
        &employee,
        cancelled.id,
        UpdateCotizacionRequest {
            estado: Some(EstadoCotizacion::Cancelada),
            ..Default::default()
        },
    )
    .await?;
    for (id, month) in [(open.id, 3), (cancelled.id, 7)] {
        sqlx::query(
            "UPDATE cotizaciones SET created_at = make_timestamptz($1, $2, 15, 12, 0, 0, 'UTC') \
             WHERE id = $3",
        )
        .bind(year)
        .bind(month)
        .bind(id)
        .execute(&state.pool)
        .await?;
    }

    let all = report_service::ingresos_mensuales(
        &state,
        &gerente,
        IngresosQuery {
            year: Some(year),
            estados: None,
        },
    )
    .await?
    .data
    .expect("revenue");
    assert_eq!(all.meses.len(), 12);
    assert_eq!((all.meses[2].cantidad, all.meses[2].total_estimado), (1, 1000.0));
    assert_eq!((all.meses[6].cantidad, all.meses[6].total_estimado), (1, 300.0));
    assert_eq!(all.meses.iter().map(|m| m.cantidad).sum::<i64>(), 2);

    let open_only = report_service::ingresos_mensuales(
        &state,
        &gerente,
        IngresosQuery {
            year: Some(year),
            estados: Some("Pendiente de Anticipo".into()),
        },
    )
    .await?
    .data
    .expect("revenue");
    assert_eq!(open_only.estados, vec!["Pendiente de Anticipo".to_string()]);
    assert_eq!(open_only.meses[2].total_estimado, 1000.0);
    assert_eq!(open_only.meses[6].cantidad, 0);

    let err = report_service::ingresos_mensuales(
        &state,
        &gerente,
        IngresosQuery {
            year: Some(year),
            estados: Some("Archivada".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    sqlx::query("DELETE FROM cotizaciones WHERE cliente_id = $1")
        .bind(cliente.id)
        .execute(&state.pool)
        .await?;
    Ok(())
}
