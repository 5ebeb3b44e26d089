use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("  {}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let settings = config.session_settings();
    let audio = config.audio_settings();
    let font = config
        .font()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());

    println!("{}", "display".cyan());
    println!("  theme:     {}", config.theme_name());
    println!("  font:      {font}");
    println!("{}", "swipe".cyan());
    println!("  threshold: {}", settings.swipe_threshold);
    println!("{}", "reveal".cyan());
    println!("  delay_ms:  {}", settings.reveal_delay.as_millis());
    println!("  value:     {}", settings.reveal_value);
    println!("{}", "audio".cyan());
    println!("  enabled:   {}", audio.enabled);
    println!("  player:    {} {}", audio.player, audio.args.join(" "));
    println!("  source:    {}", audio.source);
    Ok(())
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    tracing::debug!(%key, %value, path = %path.display(), "Config updated");
    println!("{} Set {} = {}", "\u{2713}".green().bold(), key.bold(), value);
    Ok(())
}
