//! Floor Server - 餐厅预订与桌台管理后端
//!
//! # 架构概述
//!
//! 本模块是 Floor Server 的主入口，提供以下核心功能：
//!
//! - **预订核心** (`booking`): 可用性引擎、指派协调、状态机
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **实时通知** (`notify`): 房间事件中心与 WebSocket 推送
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! floor-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── booking/       # 可用性/指派/预订核心
//! ├── notify/        # 房间事件中心
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod booking;
pub mod core;
pub mod db;
pub mod notify;
pub mod utils;

// Re-export 公共类型
pub use booking::{
    AssignmentCoordinator, AvailabilityEngine, BookingError, ReservationService, TableRegistry,
};
pub use core::{Config, Server, ServerState};
pub use notify::{EventHub, EventNotifier};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ________
   / ____/ /___  ____  _____
  / /_  / / __ \/ __ \/ ___/
 / __/ / / /_/ / /_/ / /
/_/   /_/\____/\____/_/
    "#
    );
}
