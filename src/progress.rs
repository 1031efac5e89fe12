//! 진행률 보고
//!
//! 전송 드라이버는 청크마다 옵저버를 호출하고, 옵저버가 출력 여부와
//! 출력 대상을 결정한다. 호스트 프로그램이 출력 스트림에 결합되지 않도록
//! 전역 print 대신 트레이트로 분리했다.

use tracing::info;

/// 진행률 옵저버
pub trait Progress: Send + Sync {
    /// 청크 전송 완료 시마다 호출 (sent는 1부터 total까지)
    fn on_chunk(&self, sent: usize, total: usize);
}

/// tracing 기반 기본 옵저버
///
/// `interval` 청크마다, 그리고 마지막 청크에서 `current/total (percent%)`를 출력
#[derive(Debug, Clone)]
pub struct TracingProgress {
    interval: usize,
}

impl TracingProgress {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Progress for TracingProgress {
    fn on_chunk(&self, sent: usize, total: usize) {
        if sent % self.interval == 0 || sent == total {
            let percent = (sent as f64 / total as f64) * 100.0;
            info!("Progress: {}/{} ({:.1}%)", sent, total, percent);
        }
    }
}

/// 출력 없는 옵저버 (테스트/임베딩용)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn on_chunk(&self, _sent: usize, _total: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// 호출 횟수만 세는 옵저버
    struct CountingProgress {
        calls: Arc<AtomicUsize>,
    }

    impl Progress for CountingProgress {
        fn on_chunk(&self, _sent: usize, _total: usize) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_observer_called_per_chunk() {
        let calls = Arc::new(AtomicUsize::new(0));
        let observer = CountingProgress {
            calls: calls.clone(),
        };

        for i in 1..=3 {
            observer.on_chunk(i, 3);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_interval_clamped_to_one() {
        // interval 0이어도 나눗셈 패닉 없음
        let progress = TracingProgress::new(0);
        progress.on_chunk(1, 1);
    }
}
