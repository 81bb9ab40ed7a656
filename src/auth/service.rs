use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{
    AuthError, AuthResponse, AuthUser, JwtService, LoginRequest, RefreshTokenRequest,
    RegisterRequest, TokenResponse, UserInfo, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH,
};
use crate::models::User;

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret),
            db,
        }
    }

    /// Register a new user. The empty health profile is created in the same
    /// transaction so every account always has one.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.get_user_by_email(&request.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&request.password)?;
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, is_new, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6) \
             RETURNING id, email, password_hash, first_name, last_name, is_new, created_at, \
             updated_at",
        )
        .bind(user_id)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO health_profiles (user_id, updated_at) VALUES ($1, $2)")
            .bind(user_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%user_id, "registered new user");
        self.build_auth_response(user)
    }

    /// Login user
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let user = self
            .get_user_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.build_auth_response(user)
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh(&self, request: RefreshTokenRequest) -> Result<TokenResponse, AuthError> {
        let claims = self
            .jwt_service
            .decode_token(&request.refresh_token, TOKEN_TYPE_REFRESH)?;
        let user_id: Uuid = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(TokenResponse {
            access_token: self.jwt_service.create_access_token(&user)?,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_lifetime_secs(),
        })
    }

    /// Validate an access token and resolve the authenticated caller.
    pub async fn validate_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.jwt_service.decode_token(token, TOKEN_TYPE_ACCESS)?;
        let id: Uuid = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser {
            id,
            email: claims.email,
        })
    }

    fn build_auth_response(&self, user: User) -> Result<AuthResponse, AuthError> {
        Ok(AuthResponse {
            access_token: self.jwt_service.create_access_token(&user)?,
            refresh_token: self.jwt_service.create_refresh_token(&user)?,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_lifetime_secs(),
            user: UserInfo {
                id: user.id,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                is_new: user.is_new,
                created_at: user.created_at,
            },
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, first_name, last_name, is_new, created_at, \
             updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, first_name, last_name, is_new, created_at, \
             updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }
}
