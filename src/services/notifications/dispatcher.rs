/*!
 * 推送分发
 *
 * 通知写入数据库后交给后台任务，按接收人的设备令牌调用 FCM HTTP v1 接口。
 * 推送失败只记录日志，不影响站内通知。
 */

use std::sync::Arc;
use std::time::Duration;

use actix_web::{HttpRequest, web};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::FcmConfig;
use crate::errors::Result;
use crate::models::notifications::entities::Notification;
use crate::storage::Storage;

/// 推送队列的发送端，未启用 FCM 时为空操作
#[derive(Clone, Default)]
pub struct NotificationPublisher {
    sender: Option<mpsc::Sender<Notification>>,
}

impl NotificationPublisher {
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// 入队，队列满时丢弃并告警
    pub fn publish(&self, notifications: &[Notification]) {
        let Some(sender) = &self.sender else {
            return;
        };
        for notification in notifications {
            if let Err(e) = sender.try_send(notification.clone()) {
                warn!(
                    "Dropping push for notification {}: {}",
                    notification.id, e
                );
            }
        }
    }

    /// 从 app data 获取；未注册时返回空操作实例
    pub fn from_request(request: &HttpRequest) -> Self {
        request
            .app_data::<web::Data<NotificationPublisher>>()
            .map(|data| data.get_ref().clone())
            .unwrap_or_default()
    }
}

struct FcmClient {
    http: reqwest::Client,
    url: String,
    access_token: String,
}

impl FcmClient {
    fn new(config: &FcmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            http,
            url: send_url(&config.endpoint, &config.project_id),
            access_token: config.access_token.clone(),
        })
    }

    async fn send(&self, device_token: &str, notification: &Notification) -> Result<()> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.access_token)
            .json(&message_body(device_token, notification))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(crate::errors::SchoolSystemError::notification(format!(
                "FCM responded {status}: {text}"
            )));
        }
        Ok(())
    }
}

fn send_url(endpoint: &str, project_id: &str) -> String {
    format!(
        "{}/v1/projects/{}/messages:send",
        endpoint.trim_end_matches('/'),
        project_id
    )
}

// data 字段的值必须都是字符串
fn message_body(device_token: &str, notification: &Notification) -> serde_json::Value {
    let mut data = serde_json::Map::new();
    data.insert("notification_id".into(), notification.id.to_string().into());
    data.insert(
        "type".into(),
        notification.notification_type.to_string().into(),
    );
    if let (Some(kind), Some(id)) = (&notification.reference_type, notification.reference_id) {
        data.insert("reference_type".into(), kind.clone().into());
        data.insert("reference_id".into(), id.to_string().into());
    }

    json!({
        "message": {
            "token": device_token,
            "notification": {
                "title": notification.title,
                "body": notification.content.clone().unwrap_or_default(),
            },
            "data": data,
        }
    })
}

async fn deliver(storage: &Arc<dyn Storage>, client: &FcmClient, notification: &Notification) {
    let token = match storage.get_user_by_id(notification.user_id).await {
        Ok(Some(user)) => user.device_token,
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to load recipient {}: {}", notification.user_id, e);
            return;
        }
    };
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        debug!(
            "User {} has no device token, skipping push",
            notification.user_id
        );
        return;
    };

    match client.send(&token, notification).await {
        Ok(()) => debug!(
            "Pushed notification {} to user {}",
            notification.id, notification.user_id
        ),
        Err(e) => warn!("Push for notification {} failed: {}", notification.id, e),
    }
}

/// 启动后台推送任务并返回发送端
///
/// FCM 未配置完整时不启动任务，返回空操作的发送端。
pub fn spawn_dispatcher(storage: Arc<dyn Storage>, config: &FcmConfig) -> NotificationPublisher {
    if !config.is_ready() {
        info!("FCM push disabled");
        return NotificationPublisher::disabled();
    }

    let client = match FcmClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build FCM client, push disabled: {}", e);
            return NotificationPublisher::disabled();
        }
    };

    let (sender, mut receiver) = mpsc::channel::<Notification>(config.queue_size.max(1));
    tokio::spawn(async move {
        while let Some(notification) = receiver.recv().await {
            deliver(&storage, &client, &notification).await;
        }
        debug!("FCM dispatcher stopped");
    });

    info!("FCM push enabled for project {}", config.project_id);
    NotificationPublisher {
        sender: Some(sender),
    }
}
