#[derive(Debug, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role_id: i64,
    pub employee_id: Option<i64>,
}
