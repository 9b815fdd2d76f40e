use std::sync::Arc;

use chrono_tz::Tz;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::booking::{
    AssignmentCoordinator, AvailabilityEngine, ClientDirectory, ReservationService, TableRegistry,
};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::client::DbClientDirectory;
use crate::notify::{EventHub, EventNotifier};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是请求处理的核心数据结构，使用 Arc 实现浅拷贝。
///
/// # 组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | notifier | Arc<EventNotifier> | 房间事件通知器 |
/// | directory | Arc<dyn ClientDirectory> | 客户身份解析 |
///
/// 预订核心的各服务 ([`TableRegistry`] 等) 由访问器按需构造，
/// 通知器与身份目录通过构造注入，而不是从全局单例获取。
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 房间事件通知器
    pub notifier: Arc<EventNotifier>,
    /// 客户身份解析
    pub directory: Arc<dyn ClientDirectory>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/floor.db)
    /// 3. 事件中心与通知器
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("floor.db");
        let db_path_str = db_path.to_string_lossy();
        let db_service = DbService::new(&db_path_str)
            .await
            .expect("Failed to initialize database");

        Self::with_db(config.clone(), db_service.db)
    }

    /// 在已有数据库上构建状态 (测试/oneshot 场景)
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let hub = Arc::new(EventHub::with_capacity(config.event_channel_capacity));
        let directory: Arc<dyn ClientDirectory> = Arc::new(DbClientDirectory::new(db.clone()));
        let notifier = Arc::new(EventNotifier::new(hub, directory.clone()));

        Self {
            config,
            db,
            notifier,
            directory,
        }
    }

    /// 业务时区
    pub fn tz(&self) -> Tz {
        self.config.timezone
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 桌台登记服务
    pub fn registry(&self) -> TableRegistry {
        TableRegistry::new(self.db.clone(), self.notifier.clone())
    }

    /// 可用性引擎
    pub fn availability(&self) -> AvailabilityEngine {
        AvailabilityEngine::new(self.db.clone(), self.tz())
    }

    /// 指派协调器
    pub fn coordinator(&self) -> AssignmentCoordinator {
        AssignmentCoordinator::new(self.db.clone(), self.notifier.clone())
    }

    /// 预订服务
    pub fn reservations(&self) -> ReservationService {
        ReservationService::new(self.db.clone(), self.notifier.clone(), self.tz())
    }
}
