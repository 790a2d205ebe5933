use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::client::{TranslationBackend, TranslationRequest, TranslationResponse};
use crate::clipboard::Clipboard;
use crate::controller::PopupController;
use crate::error::TranslateError;

pub type TranslationResult = Result<TranslationResponse, TranslateError>;

/// Runs translation requests on a dedicated thread with its own tokio
/// runtime. Results come back in submission order through
/// [`try_recv`](Self::try_recv), which the UI polls every frame.
pub struct TranslationWorker {
    job_tx: Sender<TranslationRequest>,
    result_rx: Receiver<TranslationResult>,
}

impl TranslationWorker {
    pub fn spawn(backend: Arc<dyn TranslationBackend>) -> anyhow::Result<Self> {
        let rt = tokio::runtime::Runtime::new()?;
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<TranslationRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<TranslationResult>();

        thread::Builder::new()
            .name("translate-worker".into())
            .spawn(move || {
                tracing::info!("Translation worker: started");
                while let Ok(request) = job_rx.recv() {
                    let result = rt.block_on(backend.translate(request));
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
                tracing::info!("Translation worker: stopped");
            })?;

        Ok(Self { job_tx, result_rx })
    }

    pub fn submit(&self, request: TranslationRequest) -> Result<(), TranslateError> {
        self.job_tx
            .send(request)
            .map_err(|_| TranslateError::Network("translation worker is not running".into()))
    }

    pub fn try_recv(&self) -> Option<TranslationResult> {
        self.result_rx.try_recv().ok()
    }

    /// Moves the popup into its busy state and hands the request over. If the
    /// worker is gone the failure is rendered at once so the controls are
    /// released.
    pub fn start<C: Clipboard>(&self, controller: &mut PopupController<C>) {
        if let Some(request) = controller.begin_translate() {
            if let Err(e) = self.submit(request) {
                controller.finish_translate(Err(e));
            }
        }
    }

    /// Renders every result that has arrived since the last frame.
    pub fn deliver<C: Clipboard>(&self, controller: &mut PopupController<C>) {
        while let Some(result) = self.try_recv() {
            controller.finish_translate(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::StatusKind;
    use crate::error::ClipboardError;
    use futures_util::future::BoxFuture;
    use std::time::{Duration, Instant};

    struct NullClipboard;

    impl Clipboard for NullClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
    }

    fn wait_for_idle(worker: &TranslationWorker, controller: &mut PopupController<NullClipboard>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.is_busy() && Instant::now() < deadline {
            worker.deliver(controller);
            thread::sleep(Duration::from_millis(5));
        }
    }

    struct Echo;

    impl TranslationBackend for Echo {
        fn translate(&self, request: TranslationRequest) -> BoxFuture<'_, TranslationResult> {
            Box::pin(async move {
                if request.text == "fail" {
                    return Err(TranslateError::Http(503));
                }
                Ok(TranslationResponse {
                    translation: request.text.to_uppercase(),
                    mode: "echo".into(),
                    original: Some(request.text),
                })
            })
        }
    }

    #[test]
    fn results_arrive_in_submission_order() {
        let worker = TranslationWorker::spawn(Arc::new(Echo)).unwrap();

        worker.submit(TranslationRequest { text: "hello".into() }).unwrap();
        worker.submit(TranslationRequest { text: "fail".into() }).unwrap();

        let first = worker.result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first.unwrap().translation, "HELLO");
        let second = worker.result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(second.unwrap_err(), TranslateError::Http(503));
        assert!(worker.try_recv().is_none());
    }

    #[test]
    fn try_recv_is_empty_before_any_submit() {
        let worker = TranslationWorker::spawn(Arc::new(Echo)).unwrap();
        assert!(worker.try_recv().is_none());
    }

    #[test]
    fn popup_round_trip_through_worker_releases_controls() {
        let worker = TranslationWorker::spawn(Arc::new(Echo)).unwrap();
        let mut controller = PopupController::new(NullClipboard);
        controller.select_example("Hello friend");

        worker.start(&mut controller);
        assert!(controller.is_busy());
        assert!(!controller.controls().translate_enabled);

        wait_for_idle(&worker, &mut controller);
        let controls = controller.controls();
        assert!(!controls.translate_busy);
        assert!(controls.translate_enabled && controls.clear_enabled && controls.swap_enabled);
        assert!(controls.copy_enabled);
        assert!(controller.output().ends_with("TEXT: HELLO FRIEND"));
        assert_eq!(controller.status().message, "✓ Translation succeeded (echo)");
    }

    #[test]
    fn backend_error_through_worker_releases_controls() {
        let worker = TranslationWorker::spawn(Arc::new(Echo)).unwrap();
        let mut controller = PopupController::new(NullClipboard);
        // Echo only fails the bare text "fail", which no prompt ever is.
        controller.select_example("anything");
        assert!(controller.begin_translate().is_some());
        worker.submit(TranslationRequest { text: "fail".into() }).unwrap();

        wait_for_idle(&worker, &mut controller);
        assert!(!controller.is_busy());
        assert_eq!(controller.output(), "");
        assert_eq!(controller.status().message, "✗ Error: HTTP 503");
    }

    #[test]
    fn dead_worker_still_releases_controls() {
        let (job_tx, job_rx) = crossbeam_channel::unbounded();
        let (_result_tx, result_rx) = crossbeam_channel::unbounded();
        drop(job_rx);
        let worker = TranslationWorker { job_tx, result_rx };

        let mut controller = PopupController::new(NullClipboard);
        controller.select_example("Hello");
        worker.start(&mut controller);

        let controls = controller.controls();
        assert!(!controls.translate_busy);
        assert!(controls.translate_enabled && controls.clear_enabled && controls.swap_enabled);
        assert_eq!(controller.status().kind, StatusKind::Error);
        assert_eq!(controller.status().message, "✗ Error: translation worker is not running");
    }
}
