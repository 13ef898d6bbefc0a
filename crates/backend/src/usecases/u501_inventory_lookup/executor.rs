use chrono::FixedOffset;
use contracts::usecases::u501_inventory_lookup::{
    record::{sale_status_label, NOT_AVAILABLE, SUCCESS_CODE},
    InventoryRecord, LookupProgress, LookupStatus, StartLookupResponse,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

use super::{error::LookupError, progress_tracker::ProgressTracker};
use crate::shared::clock::Clock;
use crate::shared::config::Config;
use crate::shared::marketplaces::coupang::{
    inventory_path, CoupangHmacSigner, Credentials, InventoryPayload,
};
use crate::shared::marketplaces::InventoryGateway;

/// Формат поля "조회일시"
const QUERIED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct LookupSettings {
    /// Пауза между запросами к шлюзу
    pub request_delay: Duration,
    /// Часовой пояс, в котором показывается время опроса
    pub presentation_offset: FixedOffset,
    /// Сколько хранить завершенные фоновые сессии
    pub session_retention: chrono::Duration,
}

impl LookupSettings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            request_delay: config.gateway.request_delay(),
            presentation_offset: config.presentation.offset()?,
            session_retention: chrono::Duration::from_std(config.sessions.retention())?,
        })
    }
}

/// Фоновая сессия: куда писать прогресс и откуда ждать отмену
struct SessionRun {
    session_id: String,
    cancel: watch::Receiver<bool>,
}

/// Executor для UseCase опроса остатков.
///
/// Запросы выполняются строго последовательно, с паузой между ними;
/// ошибка одного vendorItemId не прерывает пакет.
#[derive(Clone)]
pub struct LookupExecutor {
    gateway: Arc<dyn InventoryGateway>,
    clock: Arc<dyn Clock>,
    settings: LookupSettings,
    progress_tracker: Arc<ProgressTracker>,
}

impl LookupExecutor {
    pub fn new(
        gateway: Arc<dyn InventoryGateway>,
        clock: Arc<dyn Clock>,
        settings: LookupSettings,
        progress_tracker: Arc<ProgressTracker>,
    ) -> Self {
        Self {
            gateway,
            clock,
            settings,
            progress_tracker,
        }
    }

    /// Опросить все vendorItemId и вернуть по записи на каждый, в том же порядке.
    ///
    /// Список должен быть уже очищен от пустых значений и повторов.
    pub async fn run_batch(
        &self,
        credentials: &Credentials,
        option_ids: &[String],
    ) -> Result<Vec<InventoryRecord>, LookupError> {
        validate(credentials, option_ids)?;
        Ok(self.execute(credentials, option_ids, None).await)
    }

    /// Запустить опрос в фоне (создает async task и возвращает session_id)
    pub fn start_session(
        &self,
        credentials: Credentials,
        option_ids: Vec<String>,
    ) -> Result<StartLookupResponse, LookupError> {
        validate(&credentials, &option_ids)?;

        let removed = self
            .progress_tracker
            .cleanup_old_sessions(self.settings.session_retention);
        if removed > 0 {
            tracing::debug!("Removed {} expired lookup sessions", removed);
        }

        let session_id = Uuid::new_v4().to_string();
        let cancel = self
            .progress_tracker
            .create_session(session_id.clone(), option_ids.len());

        let executor = self.clone();
        let run = SessionRun {
            session_id: session_id.clone(),
            cancel,
        };
        tokio::spawn(async move {
            executor.execute(&credentials, &option_ids, Some(run)).await;
        });

        Ok(StartLookupResponse {
            session_id,
            status: LookupStatus::Running,
            message: "조회가 시작되었습니다.".to_string(),
        })
    }

    /// Получить текущий прогресс сессии
    pub fn get_progress(&self, session_id: &str) -> Option<LookupProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    /// Отменить фоновую сессию
    pub fn cancel_session(&self, session_id: &str) -> bool {
        let accepted = self.progress_tracker.request_cancel(session_id);
        if accepted {
            tracing::info!("Cancellation requested for session: {}", session_id);
        }
        accepted
    }

    async fn execute(
        &self,
        credentials: &Credentials,
        option_ids: &[String],
        mut session: Option<SessionRun>,
    ) -> Vec<InventoryRecord> {
        let signer = CoupangHmacSigner::new(credentials.clone());
        let total = option_ids.len();
        let mut records = Vec::with_capacity(total);
        let mut cancelled = false;

        tracing::info!("Starting inventory lookup for {} option ids", total);

        for (idx, option_id) in option_ids.iter().enumerate() {
            if session.as_ref().is_some_and(|s| *s.cancel.borrow()) {
                cancelled = true;
                break;
            }

            tracing::info!("[{}/{}] option id {}", idx + 1, total, option_id);
            if let Some(run) = &session {
                self.progress_tracker
                    .set_current_item(&run.session_id, Some(option_id.clone()));
            }

            let record = self.fetch_one(&signer, option_id).await;
            if let Some(run) = &session {
                self.progress_tracker
                    .record_item(&run.session_id, record.clone());
            }
            records.push(record);

            // Не чаще одного запроса в request_delay: лимит шлюза не документирован
            if idx + 1 < total && !self.pause(session.as_mut().map(|s| &mut s.cancel)).await {
                cancelled = true;
                break;
            }
        }

        let failed = records.iter().filter(|r| r.is_error()).count();
        tracing::info!(
            "Inventory lookup finished: total {}, succeeded {}, failed {}{}",
            total,
            records.len() - failed,
            failed,
            if cancelled { " (cancelled)" } else { "" }
        );

        if let Some(run) = &session {
            let status = if cancelled {
                LookupStatus::Cancelled
            } else if failed > 0 {
                LookupStatus::CompletedWithErrors
            } else {
                LookupStatus::Completed
            };
            self.progress_tracker
                .complete_session(&run.session_id, status);
        }

        records
    }

    /// Один подписанный запрос; любая ошибка превращается в запись `ERROR`
    async fn fetch_one(&self, signer: &CoupangHmacSigner, option_id: &str) -> InventoryRecord {
        let path = inventory_path(option_id);
        let now = self.clock.now();
        let headers = signer.sign("GET", &path, "", now);
        let queried_at = now
            .with_timezone(&self.settings.presentation_offset)
            .format(QUERIED_AT_FORMAT)
            .to_string();

        match self.gateway.get_inventory(&path, &headers).await {
            Ok(payload) => {
                let record = success_record(queried_at, option_id, payload);
                tracing::info!(
                    "  stock: {}, price: {}",
                    record.amount_in_stock,
                    record.sale_price
                );
                record
            }
            Err(e) => {
                tracing::warn!("  option id {} failed: {}", option_id, e);
                InventoryRecord::failure(queried_at, option_id.to_string(), e.operator_message())
            }
        }
    }

    /// Пауза между запросами. `false` — пока ждали, пришла отмена.
    async fn pause(&self, cancel: Option<&mut watch::Receiver<bool>>) -> bool {
        let delay = tokio::time::sleep(self.settings.request_delay);
        let Some(cancel) = cancel else {
            delay.await;
            return true;
        };

        let slept = tokio::select! {
            _ = delay => true,
            _ = wait_for_cancel(cancel) => false,
        };
        slept && !*cancel.borrow()
    }
}

async fn wait_for_cancel(cancel: &mut watch::Receiver<bool>) {
    let changed = cancel.wait_for(|requested| *requested).await.map(|_| ());
    if changed.is_err() {
        // Отправитель удален: отмены уже не будет
        std::future::pending::<()>().await;
    }
}

fn validate(credentials: &Credentials, option_ids: &[String]) -> Result<(), LookupError> {
    if !credentials.is_complete() || option_ids.is_empty() {
        return Err(LookupError::missing_input());
    }
    Ok(())
}

fn success_record(queried_at: String, option_id: &str, payload: InventoryPayload) -> InventoryRecord {
    let response_code = payload
        .code_text()
        .unwrap_or_else(|| SUCCESS_CODE.to_string());
    let data = payload.data.unwrap_or_default();

    InventoryRecord {
        queried_at,
        option_id: option_id.to_string(),
        seller_item_id: render_field(data.seller_item_id.as_ref()),
        amount_in_stock: render_field(data.amount_in_stock.as_ref()),
        sale_price: render_field(data.sale_price.as_ref()),
        sale_status: sale_status_label(data.on_sale.unwrap_or(false)).to_string(),
        response_code,
        message: payload.message.unwrap_or_default(),
    }
}

/// Значение поля ответа строкой; отсутствующее или пустое — `N/A`, ноль остается нулем
fn render_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::FixedClock;
    use crate::shared::marketplaces::coupang::{GatewayError, SignedHeaders};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Шлюз-заглушка: отвечает мгновенно, запоминает пути и заголовки
    #[derive(Default)]
    struct FakeGateway {
        calls: Mutex<Vec<(String, SignedHeaders)>>,
        failing: HashSet<String>,
    }

    impl FakeGateway {
        fn failing(ids: &[&str]) -> Self {
            Self {
                failing: ids.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }

        fn called_ids(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(path, _)| option_id_from_path(path))
                .collect()
        }
    }

    fn option_id_from_path(path: &str) -> String {
        path.trim_end_matches("/inventories")
            .rsplit('/')
            .next()
            .unwrap()
            .to_string()
    }

    #[async_trait]
    impl InventoryGateway for FakeGateway {
        async fn get_inventory(
            &self,
            path: &str,
            headers: &SignedHeaders,
        ) -> Result<InventoryPayload, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((path.to_string(), headers.clone()));
            let option_id = option_id_from_path(path);
            if self.failing.contains(&option_id) {
                return Err(GatewayError::Status {
                    status: 401,
                    message: Some("인증 실패".to_string()),
                });
            }
            Ok(serde_json::from_value(json!({
                "code": "SUCCESS",
                "message": "",
                "data": {
                    "sellerItemId": format!("S-{}", option_id),
                    "amountInStock": 7,
                    "salePrice": 12000,
                    "onSale": option_id != "OFF"
                }
            }))
            .unwrap())
        }
    }

    fn executor(gateway: Arc<FakeGateway>) -> LookupExecutor {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 2).unwrap();
        LookupExecutor::new(
            gateway,
            Arc::new(FixedClock(at)),
            LookupSettings {
                request_delay: Duration::from_millis(500),
                presentation_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
                session_retention: chrono::Duration::hours(1),
            },
            Arc::new(ProgressTracker::new()),
        )
    }

    fn credentials() -> Credentials {
        Credentials::new("ak", "sk")
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_record_per_id_in_order() {
        let gateway = Arc::new(FakeGateway::default());
        let executor = executor(gateway.clone());

        let records = executor
            .run_batch(&credentials(), &ids(&["C3", "A1", "B2"]))
            .await
            .unwrap();

        let order: Vec<&str> = records.iter().map(|r| r.option_id.as_str()).collect();
        assert_eq!(order, vec!["C3", "A1", "B2"]);
        assert_eq!(gateway.called_ids(), vec!["C3", "A1", "B2"]);

        let first = &records[0];
        assert_eq!(first.queried_at, "2024-03-05 18:07:02");
        assert_eq!(first.seller_item_id, "S-C3");
        assert_eq!(first.amount_in_stock, "7");
        assert_eq!(first.sale_price, "12000");
        assert_eq!(first.sale_status, "판매중");
        assert_eq!(first.response_code, "SUCCESS");
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_are_signed_with_clock_time() {
        let gateway = Arc::new(FakeGateway::default());
        let executor = executor(gateway.clone());

        executor
            .run_batch(&credentials(), &ids(&["A1"]))
            .await
            .unwrap();

        let calls = gateway.calls.lock().unwrap();
        let (path, headers) = &calls[0];
        assert_eq!(
            path,
            "/v2/providers/seller_api/apis/api/v1/marketplace/vendor-items/A1/inventories"
        );
        assert_eq!(headers.signed_date, "240305T090702Z");
        assert!(headers
            .authorization
            .starts_with("CEA algorithm=HmacSHA256, access-key=ak, signed-date=240305T090702Z, signature="));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_failure_does_not_abort_batch() {
        let gateway = Arc::new(FakeGateway::failing(&["B2"]));
        let executor = executor(gateway.clone());

        let records = executor
            .run_batch(&credentials(), &ids(&["A1", "B2", "C3"]))
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        let errors: Vec<&InventoryRecord> = records.iter().filter(|r| r.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].option_id, "B2");
        assert_eq!(errors[0].seller_item_id, "ERROR");
        assert_eq!(errors[0].message, "인증 실패");
        assert_eq!(records[0].response_code, "SUCCESS");
        assert_eq!(records[2].response_code, "SUCCESS");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_between_calls() {
        let gateway = Arc::new(FakeGateway::default());
        let executor = executor(gateway);
        let start = tokio::time::Instant::now();

        executor
            .run_batch(&credentials(), &ids(&["A1", "B2", "C3", "D4"]))
            .await
            .unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1500), "elapsed {:?}", elapsed);
        // После последнего запроса паузы нет
        assert!(elapsed < Duration::from_millis(2000), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_id_has_no_pause() {
        let gateway = Arc::new(FakeGateway::default());
        let executor = executor(gateway.clone());
        let start = tokio::time::Instant::now();

        let records = executor
            .run_batch(&credentials(), &ids(&["A1"]))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(gateway.called_ids(), vec!["A1"]);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_makes_no_calls() {
        let gateway = Arc::new(FakeGateway::default());
        let executor = executor(gateway.clone());

        let err = executor
            .run_batch(&Credentials::new("", "sk"), &ids(&["A1"]))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Validation(_)));

        let err = executor
            .run_batch(&Credentials::new("ak", ""), &ids(&["A1"]))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Validation(_)));

        let err = executor.run_batch(&credentials(), &[]).await.unwrap_err();
        assert!(matches!(err, LookupError::Validation(_)));

        assert!(executor.start_session(credentials(), Vec::new()).is_err());
        assert!(gateway.called_ids().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_reports_progress_until_completion() {
        let gateway = Arc::new(FakeGateway::failing(&["B2"]));
        let executor = executor(gateway);

        let started = executor
            .start_session(credentials(), ids(&["A1", "B2"]))
            .unwrap();
        assert_eq!(started.status, LookupStatus::Running);

        let progress = wait_finished(&executor, &started.session_id).await;
        assert_eq!(progress.status, LookupStatus::CompletedWithErrors);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.processed, 2);
        assert_eq!(progress.succeeded, 1);
        assert_eq!(progress.failed, 1);
        assert_eq!(progress.results.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_call() {
        let gateway = Arc::new(FakeGateway::default());
        let executor = executor(gateway.clone());

        let started = executor
            .start_session(credentials(), ids(&["A1", "B2"]))
            .unwrap();
        assert!(executor.cancel_session(&started.session_id));

        let progress = wait_finished(&executor, &started.session_id).await;
        assert_eq!(progress.status, LookupStatus::Cancelled);
        assert_eq!(progress.processed, 0);
        assert!(gateway.called_ids().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_pacing() {
        let gateway = Arc::new(FakeGateway::default());
        let executor = executor(gateway.clone());

        let started = executor
            .start_session(credentials(), ids(&["A1", "B2", "C3"]))
            .unwrap();
        // Первый запрос выполнен, executor ждет паузу
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(executor.cancel_session(&started.session_id));

        let progress = wait_finished(&executor, &started.session_id).await;
        assert_eq!(progress.status, LookupStatus::Cancelled);
        assert_eq!(progress.processed, 1);
        assert_eq!(gateway.called_ids(), vec!["A1"]);
        assert!(!executor.cancel_session(&started.session_id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_session_evicts_expired_ones() {
        let gateway = Arc::new(FakeGateway::default());
        let mut executor = executor(gateway);
        executor.settings.session_retention = chrono::Duration::zero();

        let first = executor
            .start_session(credentials(), ids(&["A1"]))
            .unwrap();
        wait_finished(&executor, &first.session_id).await;

        let second = executor
            .start_session(credentials(), ids(&["B2"]))
            .unwrap();

        assert!(executor.get_progress(&first.session_id).is_none());
        assert!(executor.get_progress(&second.session_id).is_some());
    }

    async fn wait_finished(executor: &LookupExecutor, session_id: &str) -> LookupProgress {
        for _ in 0..1000 {
            let progress = executor.get_progress(session_id).unwrap();
            if progress.is_finished() {
                return progress;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("session {} did not finish", session_id);
    }

    #[test]
    fn test_success_record_fallbacks() {
        let payload: InventoryPayload = serde_json::from_value(json!({
            "data": {"amountInStock": 0, "salePrice": "", "onSale": false}
        }))
        .unwrap();

        let record = success_record("t".into(), "A1", payload);

        assert_eq!(record.seller_item_id, "N/A");
        assert_eq!(record.amount_in_stock, "0");
        assert_eq!(record.sale_price, "N/A");
        assert_eq!(record.sale_status, "판매중지");
        assert_eq!(record.response_code, "SUCCESS");
        assert_eq!(record.message, "");
    }

    #[test]
    fn test_success_record_without_data() {
        let payload: InventoryPayload =
            serde_json::from_value(json!({"code": "SUCCESS", "message": "ok"})).unwrap();

        let record = success_record("t".into(), "A1", payload);

        assert_eq!(record.amount_in_stock, "N/A");
        assert_eq!(record.sale_status, "판매중지");
        assert_eq!(record.message, "ok");
    }
}
