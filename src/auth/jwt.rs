use crate::models::{Claims, TokenType};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

fn issue(
    user_id: i64,
    username: String,
    role: i64,
    employee_id: Option<i64>,
    token_type: TokenType,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    let claims = Claims {
        user_id,
        sub: username,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type,
        employee_id,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn generate_access_token(
    user_id: i64,
    username: String,
    role: i64,
    employee_id: Option<i64>,
    secret: &str,
    ttl: usize,
) -> Result<String, Error> {
    issue(user_id, username, role, employee_id, TokenType::Access, secret, ttl)
        .map(|(token, _)| token)
}

pub fn generate_refresh_token(
    user_id: i64,
    username: String,
    role: i64,
    employee_id: Option<i64>,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    issue(user_id, username, role, employee_id, TokenType::Refresh, secret, ttl)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_carry_type_and_identity() {
        let access = generate_access_token(7, "ann".into(), 2, Some(3), "secret", 60).unwrap();
        let claims = verify_token(&access, "secret").unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.sub, "ann");
        assert_eq!(claims.role, 2);
        assert_eq!(claims.employee_id, Some(3));
        assert_eq!(claims.token_type, TokenType::Access);

        let (refresh, issued) =
            generate_refresh_token(7, "ann".into(), 2, None, "secret", 60).unwrap();
        let decoded = verify_token(&refresh, "secret").unwrap();
        assert_eq!(decoded.token_type, TokenType::Refresh);
        assert_eq!(decoded.jti, issued.jti);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(1, "a".into(), 1, None, "one", 60).unwrap();
        assert!(verify_token(&token, "two").is_err());
    }
}
