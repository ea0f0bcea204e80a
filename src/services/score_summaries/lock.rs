//! 汇总范围写锁
//!
//! 存储层已把每次写入与汇总刷新放在同一事务里，但在 PostgreSQL 默认的
//! READ COMMITTED 下，两个并发事务仍可能各自读到旧的权重之和或旧的成绩集合。
//! 同一进程内对同一范围的写入在这里排队执行。

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use once_cell::sync::Lazy;
use tokio::sync::{Mutex, MutexGuard};

use crate::models::evaluation_methods::entities::EvaluationScope;

// 分段数，不同范围落在同一段时只会多等一会儿
const STRIPES: usize = 64;

static SCOPE_LOCKS: Lazy<Vec<Mutex<()>>> =
    Lazy::new(|| (0..STRIPES).map(|_| Mutex::new(())).collect());

fn stripe_of(scope: &EvaluationScope) -> usize {
    let mut hasher = DefaultHasher::new();
    scope.hash(&mut hasher);
    (hasher.finish() % STRIPES as u64) as usize
}

/// 获取范围写锁，guard 释放前同范围的其他写入等待
pub async fn lock_scope(scope: EvaluationScope) -> MutexGuard<'static, ()> {
    SCOPE_LOCKS[stripe_of(&scope)].lock().await
}
