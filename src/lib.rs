//! Academy Exam Server - 考试交卷服务
//!
//! 负责把一次考试的成绩汇总写入系统记录库，同时把逐题结果追加到独立的结果日志库。
//! 两个库之间没有共享事务，由 `saga` 模块通过补偿保证最终一致。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `saga`: 交卷协调与补偿
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM，两个独立连接）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod saga;
pub mod services;
pub mod storage;
pub mod utils;
