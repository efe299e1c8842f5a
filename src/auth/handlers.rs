use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    error::{AppError, AppResult},
    model::user::User,
    models::{Claims, CreateUserReq, LoginReqDto, TokenPair, TokenType},
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, error, info, instrument};

fn bearer(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Sign a new access/refresh pair and persist the refresh jti.
async fn issue_pair(
    pool: &SqlitePool,
    config: &Config,
    user_id: i64,
    username: &str,
    role: i64,
    employee_id: Option<i64>,
) -> Result<TokenPair, HttpResponse> {
    let access_token = generate_access_token(
        user_id,
        username.to_string(),
        role,
        employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );
    let refresh = generate_refresh_token(
        user_id,
        username.to_string(),
        role,
        employee_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    let (access_token, (refresh_token, refresh_claims)) = match (access_token, refresh) {
        (Ok(a), Ok(r)) => (a, r),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Failed to sign token");
            return Err(HttpResponse::InternalServerError().finish());
        }
    };

    debug!(user_id, jti = %refresh_claims.jti, "Storing refresh token");
    if let Err(e) =
        sqlx::query("INSERT INTO refresh_tokens (user_id, jti, expires_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(&refresh_claims.jti)
            .bind(refresh_claims.exp as i64)
            .execute(pool)
            .await
    {
        error!(error = %e, "Failed to store refresh token");
        return Err(HttpResponse::InternalServerError().finish());
    }

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Access and refresh tokens", body = TokenPair),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().json(json!({"message": "Username or password required"}));
    }

    let db_user = match sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, role_id, employee_id
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(user.username.trim())
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().json(json!({"message": "Invalid credentials"}));
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().json(json!({"message": "Invalid credentials"}));
    }

    let pair = match issue_pair(
        pool.get_ref(),
        &config,
        db_user.id,
        &db_user.username,
        db_user.role_id,
        db_user.employee_id,
    )
    .await
    {
        Ok(pair) => pair,
        Err(resp) => return resp,
    };

    if let Err(e) = sqlx::query("UPDATE users SET last_login_at = datetime('now') WHERE id = ?")
        .bind(db_user.id)
        .execute(pool.get_ref())
        .await
    {
        // not fatal to the login
        error!(error = %e, "Failed to update last_login_at");
    }

    info!("Login successful");
    HttpResponse::Ok().json(pair)
}

fn refresh_claims(req: &HttpRequest, config: &Config) -> Option<Claims> {
    let claims = verify_token(bearer(req)?, &config.jwt_secret).ok()?;
    (claims.token_type == TokenType::Refresh).then_some(claims)
}

/// Rotate a refresh token: the presented one is revoked and a new pair issued.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New access and refresh tokens", body = TokenPair),
        (status = 401, description = "Refresh token missing, invalid or revoked")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> impl Responder {
    let Some(claims) = refresh_claims(&req, &config) else {
        return HttpResponse::Unauthorized().json(json!({"message": "Invalid token"}));
    };

    // revoke first; a second use of the same jti then matches nothing
    let revoked = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = 1
        WHERE jti = ? AND revoked = 0 AND expires_at > CAST(strftime('%s', 'now') AS INTEGER)
        "#,
    )
    .bind(&claims.jti)
    .execute(pool.get_ref())
    .await;

    match revoked {
        Ok(r) if r.rows_affected() == 1 => {}
        Ok(_) => {
            info!(jti = %claims.jti, "Refresh token unknown or already revoked");
            return HttpResponse::Unauthorized().json(json!({"message": "Invalid token"}));
        }
        Err(e) => {
            error!(error = %e, "Failed to revoke refresh token");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match issue_pair(
        pool.get_ref(),
        &config,
        claims.user_id,
        &claims.sub,
        claims.role,
        claims.employee_id,
    )
    .await
    {
        Ok(pair) => HttpResponse::Ok().json(pair),
        Err(resp) => resp,
    }
}

/// Revoke a refresh token. Always succeeds.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out")),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn logout(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> impl Responder {
    let Some(claims) = refresh_claims(&req, &config) else {
        return HttpResponse::NoContent().finish();
    };

    if let Err(e) = sqlx::query("UPDATE refresh_tokens SET revoked = 1 WHERE jti = ?")
        .bind(&claims.jti)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to revoke refresh token");
    }

    HttpResponse::NoContent().finish()
}

/// Create a user account (Admin only)
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "User created", body = Object, example = json!({
            "message": "User created", "id": 2
        })),
        (status = 400, description = "Username or password missing"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Username already taken")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateUserReq>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("Username and password must not be empty".into()).into());
    }

    let id = insert_user(pool.get_ref(), username, &payload).await?;
    info!(id, username, role = ?payload.role, by = %auth.username, "User created");

    Ok(HttpResponse::Created().json(json!({"message": "User created", "id": id})))
}

async fn insert_user(pool: &SqlitePool, username: &str, payload: &CreateUserReq) -> AppResult<i64> {
    let hashed = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        AppError::Validation("Password could not be hashed".into())
    })?;

    let result =
        sqlx::query("INSERT INTO users (username, password, role_id, employee_id) VALUES (?, ?, ?, ?)")
            .bind(username)
            .bind(hashed)
            .bind(payload.role.id())
            .bind(payload.employee_id)
            .execute(pool)
            .await?;

    Ok(result.last_insert_rowid())
}
