use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 调用方角色，来自外部认证服务签发的 JWT
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub enum CallerRole {
    Student, // 学生
    Teacher, // 教师
    Admin,   // 管理员
}

impl CallerRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const ADMIN: &'static str = "admin";

    pub fn staff_roles() -> &'static [CallerRole] {
        &[CallerRole::Teacher, CallerRole::Admin]
    }

    pub fn is_staff(&self) -> bool {
        Self::staff_roles().contains(self)
    }
}

impl<'de> Deserialize<'de> for CallerRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<CallerRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, teacher, admin"
            ))
        })
    }
}

impl std::fmt::Display for CallerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallerRole::Student => write!(f, "{}", CallerRole::STUDENT),
            CallerRole::Teacher => write!(f, "{}", CallerRole::TEACHER),
            CallerRole::Admin => write!(f, "{}", CallerRole::ADMIN),
        }
    }
}

impl std::str::FromStr for CallerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CallerRole::STUDENT => Ok(CallerRole::Student),
            CallerRole::TEACHER => Ok(CallerRole::Teacher),
            CallerRole::ADMIN => Ok(CallerRole::Admin),
            _ => Err(format!("Invalid caller role: {s}")),
        }
    }
}

/// 已通过 JWT 认证的调用方，由中间件写入请求扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub role: CallerRole,
}
