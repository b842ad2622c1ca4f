use clap::Parser;
use viewer::utils::{ansi::red, logger, validation::Validate};
use viewer::{CliConfig, Editor, LocalStorage, PosixTerminal, RawModeGuard, ViewerError};

fn main() {
    let cli = CliConfig::parse();

    if let Err(e) = run(&cli) {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Viewer failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        // 輸出用戶友好的錯誤信息
        eprintln!("{}", red(&format!("❌ {}", e.user_friendly_message())));
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }
}

fn run(cli: &CliConfig) -> Result<(), ViewerError> {
    // 載入並驗證配置
    let config = cli.load_settings()?;
    config.validate()?;

    // 初始化日誌
    logger::init_file_logger(&config.logging, cli.verbose)?;

    tracing::info!("Starting viewer");
    tracing::debug!("CLI config: {:?}", cli);

    let storage = LocalStorage::current_dir();
    let mut terminal = RawModeGuard::new(PosixTerminal::open()?)?;
    tracing::debug!("Raw mode enabled: {}", terminal.is_raw_mode());

    let mut editor = Editor::new(&mut *terminal, storage, config.editor_settings());
    if let Some(file) = &cli.file {
        editor.open(file)?;
    }
    editor.run()
}
