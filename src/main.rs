use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use physician_metrics::config::{Cli, Commands, Config, OutputFormat};
use physician_metrics::dashboard::form::resolve_doctor;
use physician_metrics::dashboard::{Dashboard, PatientForm, PhysicianView};
use physician_metrics::interactive::{EditorSource, Interactive};
use physician_metrics::session::{PhysicianMetrics, Session};

fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load_with_cli(&cli)?;

    // 初始化日志系统，guard 需存活到退出
    let _log_guard = config.init_logging()?;

    tracing::info!("Physician Metrics starting...");

    let command = cli.command.unwrap_or(Commands::Interactive);
    handle_command(command, &config)
}

fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Interactive => {
            let mut session = Session::from_config(config)?;
            let source = EditorSource::new().context("无法初始化终端输入")?;
            Interactive::new(&mut session, &config.display, source, std::io::stdout()).run()?;
        }
        Commands::Show => {
            let session = Session::from_config(config)?;
            print!("{}", Dashboard::build(&session, &config.display)?);
        }
        Commands::Metrics { doctor, format } => {
            let session = Session::from_config(config)?;
            let names: Vec<String> = match doctor {
                Some(input) => vec![resolve_doctor(session.roster(), &input)?],
                None => session.roster().physician_names().map(String::from).collect(),
            };

            match format {
                OutputFormat::Text => {
                    for name in &names {
                        println!("{}", PhysicianView::build(&session, name)?);
                    }
                }
                OutputFormat::Json => {
                    let metrics = names
                        .into_iter()
                        .map(|physician| -> Result<PhysicianMetrics> {
                            let metrics = session.metrics_for(&physician)?;
                            Ok(PhysicianMetrics { physician, metrics })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    println!("{}", serde_json::to_string_pretty(&metrics)?);
                }
            }
        }
        Commands::Add {
            doctor,
            patient,
            blood_pressure,
            cholesterol,
            ha1c,
            format,
        } => {
            let mut session = Session::from_config(config)?;
            let form = PatientForm {
                doctor,
                patient,
                blood_pressure,
                cholesterol,
                ha1c,
            };
            let command = form.into_command(session.roster())?;
            let receipt = session.add_patient(command)?;
            tracing::warn!("data is not saved; the next run starts from the seed roster");

            match format {
                OutputFormat::Text => {
                    println!("{}\n", receipt.message());
                    print!("{}", Dashboard::build(&session, &config.display)?);
                }
                OutputFormat::Json => {
                    let metrics = session.metrics_for(&receipt.physician)?;
                    let output = serde_json::json!({
                        "receipt": receipt,
                        "metrics": metrics,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
            }
        }
        Commands::PrintConfig => {
            print!("{}", Config::generate_default_config()?);
        }
        Commands::ResetConfig => {
            // 重置配置
            let default_config = Config::default();
            if let Some(config_path) = Config::get_user_config_path() {
                default_config.save_to_file(&config_path)?;
                println!("配置已重置到: {}", config_path.display());
            } else {
                println!("无法确定配置文件路径");
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "physician-metrics", &mut std::io::stdout());
        }
    }

    Ok(())
}
