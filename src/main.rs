use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
pub mod mappings;
mod services;
mod utils;

use config::Config;
use error::NavError;
use services::{
    create_input_interceptor, create_pointer_actuator, create_window_backend, EventDispatcher,
    FocusResolver, NavigationSession, WindowSnapshotProvider,
};
use utils::notify::notify_fatal;

#[derive(Parser, Debug)]
#[command(name = "wnav")]
#[command(about = "Навигация между окнами стрелками: Ctrl+Up, стрелки, Enter или Esc")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "wnav.toml")]
    config: String,

    /// Режим сухого запуска (без захвата клавиатуры и синтетического ввода)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (переопределяет конфигурацию)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск wnav v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    // Блокировка держится до конца main
    let instance_lock = match utils::single_instance::acquire(&utils::single_instance::default_lock_path()) {
        Ok(lock) => lock,
        Err(NavError::AlreadyRunning(details)) => {
            notify_fatal("wnav уже запущен", &details).await;
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            notify_fatal("wnav не запущен", &e.to_string()).await;
            return Ok(ExitCode::FAILURE);
        }
    };

    let interceptor = match build_interceptor(&config, args.dry_run) {
        Ok(interceptor) => interceptor,
        Err(e) => {
            let body = if e.is_registration_failure() {
                format!(
                    "{}\n\nНастройка доступа:\n{}",
                    e,
                    utils::permissions::get_setup_commands().join("\n")
                )
            } else {
                e.to_string()
            };
            notify_fatal("wnav: не удалось перехватить ввод", &body).await;
            return Ok(ExitCode::FAILURE);
        }
    };

    info!("Все компоненты инициализированы (блокировка {})", instance_lock.path().display());

    let mut interceptor_handle = tokio::spawn(async move {
        if let Err(e) = interceptor.run().await {
            error!("Ошибка в InputInterceptor: {}", e);
        }
    });

    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
            Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
        },
        _ = &mut interceptor_handle => {
            error!("InputInterceptor остановился");
            return Ok(ExitCode::FAILURE);
        }
    }

    info!("Завершение работы...");

    // Прерываем задачу, чтобы освободить захват клавиатуры в Drop
    interceptor_handle.abort();
    let _ = interceptor_handle.await;

    info!("wnav завершил работу");
    Ok(ExitCode::SUCCESS)
}

/// Собрать бэкенд окон, указатель, сессию и перехватчик ввода
fn build_interceptor(
    config: &Config,
    dry_run: bool,
) -> error::Result<Box<dyn services::input_interceptor::InputInterceptorTrait + Send>> {
    utils::permissions::check_permissions(dry_run)?;

    let backend = create_window_backend(config)?;
    let pointer = create_pointer_actuator(config, backend.as_ref(), dry_run)?;

    let session = NavigationSession::new(
        WindowSnapshotProvider::new(backend.clone()),
        FocusResolver::new(backend),
        pointer,
    );

    create_input_interceptor(config, EventDispatcher::new(session), dry_run)
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "full" => registry.with(tracing_subscriber::fmt::layer()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
    }

    Ok(())
}
