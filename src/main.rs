use cc_sentiment::app::{run, PromptConfirmation, RunOutcome};
use cc_sentiment::utils::error::{EtlError, ErrorSeverity};
use cc_sentiment::utils::logger;
use cc_sentiment::CliConfig;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 先讀設定檔，才能依 [monitoring].json_logs 選擇日誌格式
    let config = cli.load_job_config();
    let json_logs = match &config {
        Ok(config) => config.monitoring.json_logs,
        Err(_) => cli.json_logs,
    };

    // 初始化日誌
    if json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting cc-sentiment");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let outcome = match config {
        Ok(config) => run(&cli, config, &PromptConfirmation).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(outcome) => print_outcome(&outcome),
        Err(e) => report_and_exit(&e),
    }
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NoJobs | RunOutcome::Cancelled => {}
        RunOutcome::DryRun(jobs) => {
            for job in jobs {
                println!("{} -> {}", job.input.display(), job.output.display());
            }
        }
        RunOutcome::Built(summary) => {
            println!(
                "✅ Built {} datasets ({} skipped, {} failed)",
                summary.processed,
                summary.skipped.len(),
                summary.failed.len()
            );
            for output in &summary.outputs {
                println!("📁 {}", output);
            }
        }
    }
}

fn report_and_exit(e: &EtlError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Build failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
