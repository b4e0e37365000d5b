use futures::future::join_all;
use price_sensitivity::analyzer::{Analyzer, AnalyzerImpl};
use price_sensitivity::config::{load_config, AppConfig, SurveyConfig};
use price_sensitivity::notifier::{Notifier, TelegramNotifier};
use price_sensitivity::parser::load_responses;
use price_sensitivity::report::{render_text, save_report};
use price_sensitivity::storage::SqliteStorage;
use price_sensitivity::survey::Survey;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config: Arc<AppConfig> = match load_config(&config_path) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let analyzer = AnalyzerImpl::new();

    let storage = match SqliteStorage::new(&config.database_path) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    let notifier: Option<Arc<dyn Notifier>> = match &config.telegram {
        Some(tg) => match TelegramNotifier::new(tg.bot_token.clone(), tg.chat_id) {
            Ok(n) => Some(Arc::new(n) as Arc<dyn Notifier>),
            Err(e) => {
                warn!("Telegram disabled: {}", e);
                None
            }
        },
        None => None,
    };

    loop {
        info!("Surveys to process: {}", config.surveys.len());

        let tasks: Vec<_> = config
            .surveys
            .iter()
            .map(|survey_cfg| {
                process_survey(survey_cfg, &analyzer, storage.clone(), config.clone(), notifier.clone())
            })
            .collect();

        join_all(tasks).await;

        let Some(interval) = config.check_interval_seconds else {
            break;
        };

        info!("Waiting {}s before re-importing surveys...", interval);
        tokio::select! {
            _ = sleep(Duration::from_secs(interval)) => {
                info!("Timer triggered.");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested.");
                break;
            }
        }
    }
}

/// Imports, analyzes, stores and reports a single survey.
/// Skips surveys whose rows match the latest recorded run.
async fn process_survey(
    survey_cfg: &SurveyConfig,
    analyzer: &AnalyzerImpl,
    storage: Arc<Mutex<SqliteStorage>>,
    config: Arc<AppConfig>,
    notifier: Option<Arc<dyn Notifier>>,
) {
    let name = survey_cfg.name.as_str();
    info!("Processing survey: {}", name);

    let imported = match load_responses(&survey_cfg.source) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Import of {} rejected: {}", survey_cfg.source, e);
            return;
        }
    };
    let survey = Survey::with_responses(name, imported);

    {
        let storage_guard = storage.lock().await;
        match storage_guard.is_up_to_date(name, survey.responses()) {
            Ok(true) => {
                info!("Survey {} unchanged since its last analysis, skipping.", name);
                return;
            }
            Ok(false) => {}
            Err(e) => warn!("Failed to compare with previous analysis: {}", e),
        }
        if let Ok(Some(prev)) = storage_guard.last_analysis(name) {
            info!(
                "Previous run: {} respondents, recommended {:?} | {}",
                prev.respondents, prev.recommended_price, prev.run_at
            );
        }
    }

    info!("{} of {} responses are valid", survey.valid_count(), survey.len());
    let result = analyzer.analyze(survey.responses());
    let outcome = analyzer.recommend(&result);

    let text = render_text(name, &result, &outcome, &config.currency);
    info!("\n{}", text);

    if let Err(e) = storage.lock().await.save_run(name, survey.responses(), &result, &outcome) {
        warn!("Recording analysis failed: {}", e);
    }

    if let Some(dir) = &config.report_dir {
        if let Err(e) = save_report(Path::new(dir), name, &result, &outcome, &config.currency) {
            warn!("Report export failed: {}", e);
        }
    }

    if let Some(notifier) = notifier {
        if let Err(e) = notifier.notify_text(&text).await {
            warn!("Notification failed: {}", e);
        }
    }

    info!("Finished processing survey: {}", name);
}
