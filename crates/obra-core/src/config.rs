//! Configuración del motor desde variables de entorno.
//! Usa convención `OBRAFLOW_*` con valores por defecto razonables.

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Parámetros de contención del libro de avance: cuánto espera `reserve`
/// por el candado de una partida antes de fallar con `Busy`, y cada
/// cuánto reintenta mientras espera.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub reserve_timeout: Duration,
    pub reserve_backoff: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { reserve_timeout: Duration::from_millis(50),
               reserve_backoff: Duration::from_micros(200) }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        let timeout_ms = env::var("OBRAFLOW_RESERVE_TIMEOUT_MS").ok()
                                                                .and_then(|v| v.parse().ok())
                                                                .unwrap_or(50);
        let backoff_us = env::var("OBRAFLOW_RESERVE_BACKOFF_US").ok()
                                                                .and_then(|v| v.parse().ok())
                                                                .unwrap_or(200);
        Self { reserve_timeout: Duration::from_millis(timeout_ms),
               reserve_backoff: Duration::from_micros(backoff_us) }
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
