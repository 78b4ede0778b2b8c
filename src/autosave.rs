//! 编辑端防抖自动保存调度器。
//! 编辑器每次击键产生新的待保存负载，这里只保留最新一份，
//! 静默期结束后才调用保存回调；保存失败按指数退避重试，次数封顶，
//! 超限即放弃本轮（下一次编辑会带来更新的负载）。
//! 调度器不感知保存层的错误分类，任何错误一视同仁。
//! 这是编辑端（客户端）组件，服务进程本身不使用它

#![allow(dead_code)]

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

#[derive(Debug, Clone)]
pub struct AutosaveConfig {
    /// 最后一次编辑后的静默期
    pub debounce: Duration,
    /// 每轮保存的最大重试次数（不含首次尝试）
    pub max_retries: u32,
    /// 首次重试前的等待，之后逐次翻倍
    pub initial_backoff: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(2),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

/// 自动保存句柄。drop 后调度任务在冲刷完剩余负载后退出
pub struct Autosaver<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Autosaver<T>
where
    T: Clone + Send + 'static,
{
    pub fn spawn<F, Fut, E>(config: AutosaveConfig, save: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_loop(config, rx, save));
        Self { tx }
    }

    /// 提交一份待保存负载，覆盖尚未冲刷的旧负载
    pub fn submit(&self, payload: T) -> bool {
        self.tx.send(payload).is_ok()
    }
}

async fn run_loop<T, F, Fut, E>(config: AutosaveConfig, mut rx: mpsc::UnboundedReceiver<T>, save: F)
where
    T: Clone,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    while let Some(mut pending) = rx.recv().await {
        // 静默期内有新负载就合并为最新一份并重新计时
        loop {
            match time::timeout(config.debounce, rx.recv()).await {
                Ok(Some(newer)) => pending = newer,
                // 发送端已关闭：冲刷手头这份后退出
                Ok(None) => {
                    flush(&config, pending, &save).await;
                    return;
                }
                Err(_) => break,
            }
        }
        flush(&config, pending, &save).await;
    }
}

async fn flush<T, F, Fut, E>(config: &AutosaveConfig, payload: T, save: &F)
where
    T: Clone,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut delay = config.initial_backoff;
    let mut attempt = 0u32;
    loop {
        match save(payload.clone()).await {
            Ok(()) => return,
            Err(e) => {
                attempt += 1;
                if attempt > config.max_retries {
                    tracing::warn!("自动保存重试 {} 次后放弃：{e}", config.max_retries);
                    return;
                }
                tracing::debug!("自动保存失败（第 {attempt} 次）：{e}，{delay:?} 后重试");
                time::sleep(delay).await;
                delay *= 2;
            }
        }
    }
}
