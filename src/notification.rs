use tracing::{error, info};

use crate::types::Severity;

/// 사용자 알림 표시 인터페이스 (snackbar 대체)
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);

    /// 현재 표시 중인 알림 닫기
    fn dismiss(&self) {}

    fn info(&self, message: &str) {
        if !message.is_empty() {
            self.notify(Severity::Info, message);
        }
    }

    fn success(&self, message: &str) {
        self.notify(Severity::Success, message);
    }

    /// 빈 메시지는 알림을 닫는다
    fn error(&self, message: &str) {
        if message.is_empty() {
            self.dismiss();
        } else {
            self.notify(Severity::Error, message);
        }
    }
}

/// tracing 로그로 알림을 출력
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => info!("ℹ️ {}", message),
            Severity::Success => info!("✅ {}", message),
            Severity::Error => error!("❌ {}", message),
        }
    }
}
