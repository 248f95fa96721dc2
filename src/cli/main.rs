use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Madrid district names as shown to the user, mapped to their codes.
const DISTRITOS: [(&str, i64); 21] = [
    ("Centro", 1),
    ("Arganzuela", 2),
    ("Retiro", 3),
    ("Salamanca", 4),
    ("Chamartín", 5),
    ("Tetuán", 6),
    ("Chamberí", 7),
    ("Fuencarral-El Pardo", 8),
    ("Moncloa-Aravaca", 9),
    ("Latina", 10),
    ("Carabanchel", 11),
    ("Usera", 12),
    ("Puente de Vallecas", 13),
    ("Moratalaz", 14),
    ("Ciudad Lineal", 15),
    ("Hortaleza", 16),
    ("Villaverde", 17),
    ("Villa de Vallecas", 18),
    ("Vicálvaro", 19),
    ("San Blas-Canillejas", 20),
    ("Barajas", 21),
];

#[derive(Parser)]
#[command(name = "lesividad-cli")]
#[command(about = "Cliente del sistema de predicción de lesividad", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    endpoint: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the lesividad of an accident
    #[command(group(
        ArgGroup::new("ubicacion")
            .required(true)
            .args(["distrito", "coordenada_x"])
    ))]
    Predict {
        #[arg(long, default_value = "Turismo")]
        tipo_vehiculo: String,

        #[arg(long, default_value = "Conductor")]
        tipo_persona: String,

        #[arg(long, default_value = "Colisión lateral")]
        tipo_accidente: String,

        #[arg(long, default_value = "Hombre")]
        sexo: String,

        #[arg(long, default_value = "De 30 a 34 años")]
        rango_edad: String,

        #[arg(long, default_value = "Despejado")]
        estado_meteorologico: String,

        /// District name ("Centro") or code (1..21)
        #[arg(long)]
        distrito: Option<String>,

        /// X coordinate, in the units the model was fitted with
        #[arg(long, requires = "coordenada_y", conflicts_with = "distrito")]
        coordenada_x: Option<f64>,

        /// Y coordinate, in the units the model was fitted with
        #[arg(long, requires = "coordenada_x")]
        coordenada_y: Option<f64>,
    },

    /// Check server health
    Health,

    /// Show model information
    Info,
}

fn resolve_distrito(input: &str) -> anyhow::Result<i64> {
    if let Ok(code) = input.parse::<i64>() {
        anyhow::ensure!(
            (1..=21).contains(&code),
            "el código de distrito debe estar entre 1 y 21"
        );
        return Ok(code);
    }
    DISTRITOS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(input))
        .map(|(_, code)| *code)
        .with_context(|| format!("distrito desconocido: '{input}'"))
}

fn render_result(body: &Value) {
    let prediction = body.get("prediction").and_then(Value::as_i64);
    let probability = body.get("probability").and_then(Value::as_f64).unwrap_or(0.0);

    println!("==============================================");
    match prediction {
        Some(1) => {
            println!("  Sin Asistencia Sanitaria");
            println!("  Probabilidad: {:.1}%", probability * 100.0);
            println!();
            println!("  El modelo predice que este accidente");
            println!("  probablemente no requerirá asistencia");
            println!("  sanitaria inmediata.");
        }
        _ => {
            println!("  Asistencia Sanitaria Requerida");
            println!("  Probabilidad: {:.1}%", probability * 100.0);
            println!();
            println!("  El modelo predice que este accidente");
            println!("  probablemente requerirá asistencia");
            println!("  sanitaria. Se recomienda activar");
            println!("  protocolos de emergencia.");
        }
    }
    println!("==============================================");
}

fn render_connectivity_error() {
    println!("----------------------------------------------");
    println!("  Error de conexión: no se pudo conectar con");
    println!("  el sistema de análisis. Verifica que el");
    println!("  servidor esté ejecutándose.");
    println!("----------------------------------------------");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::builder()
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()?;

    match cli.command {
        Commands::Predict {
            tipo_vehiculo,
            tipo_persona,
            tipo_accidente,
            sexo,
            rango_edad,
            estado_meteorologico,
            distrito,
            coordenada_x,
            coordenada_y,
        } => {
            let mut request = json!({
                "tipo_vehiculo": tipo_vehiculo,
                "tipo_persona": tipo_persona,
                "tipo_accidente": tipo_accidente,
                "sexo": sexo,
                "rango_edad": rango_edad,
                "estado_meteorológico": estado_meteorologico,
            });

            if let Some(name) = distrito {
                request["cod_distrito"] = json!(resolve_distrito(&name)?);
            } else if let (Some(x), Some(y)) = (coordenada_x, coordenada_y) {
                request["coordenada_x_utm"] = json!(x);
                request["coordenada_y_utm"] = json!(y);
            }

            let response = match client
                .post(format!("{}/predict", cli.endpoint))
                .json(&request)
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) if err.is_connect() || err.is_timeout() => {
                    render_connectivity_error();
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };

            let status = response.status();
            let body: Value = response.json().await?;

            if status.is_success() {
                render_result(&body);
            } else {
                println!("La predicción falló ({})", status);
                println!("{}", serde_json::to_string_pretty(&body)?);
                std::process::exit(1);
            }
        }

        Commands::Health => {
            let response = client
                .get(format!("{}/health", cli.endpoint))
                .send()
                .await
                .map_err(|err| {
                    if err.is_connect() || err.is_timeout() {
                        render_connectivity_error();
                        std::process::exit(1);
                    }
                    err
                })?;

            let body: Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Info => {
            let response = client
                .get(format!("{}/modelo/info", cli.endpoint))
                .send()
                .await
                .map_err(|err| {
                    if err.is_connect() || err.is_timeout() {
                        render_connectivity_error();
                        std::process::exit(1);
                    }
                    err
                })?;

            let body: Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
