use cs_core::ServerSettings;

/// One user-adjustable server setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    OnlineMode,
    GameMode,
    ContentLogConsoleOutput,
    EmitTelemetry,
}

impl Setting {
    /// Operation name used when an edition lacks the setting
    pub fn operation(&self) -> &'static str {
        match self {
            Self::OnlineMode => "online mode setting",
            Self::GameMode => "game mode setting",
            Self::ContentLogConsoleOutput => "content log setting",
            Self::EmitTelemetry => "telemetry setting",
        }
    }

    /// Provided fields of a partial update, rendered as properties values.
    pub fn requested(settings: &ServerSettings) -> Vec<(Setting, String)> {
        let mut requested = Vec::new();

        if let Some(online_mode) = settings.online_mode {
            requested.push((Self::OnlineMode, online_mode.to_string()));
        }
        if let Some(game_mode) = settings.game_mode {
            requested.push((Self::GameMode, game_mode.as_str().to_string()));
        }
        if let Some(enabled) = settings.content_log_console_output {
            requested.push((Self::ContentLogConsoleOutput, enabled.to_string()));
        }
        if let Some(enabled) = settings.emit_telemetry {
            requested.push((Self::EmitTelemetry, enabled.to_string()));
        }

        requested
    }
}
