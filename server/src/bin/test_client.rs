use clap::Parser;
use serde_json::Value;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::sleep;

#[derive(Parser, Debug)]
#[command(author, version, about = "Drives a running game server through one player's commands")]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8889")]
    server: String,

    /// Color to register as
    #[arg(short = 'c', long, default_value = "black")]
    color: String,

    /// Number of state polls to perform
    #[arg(short = 'n', long, default_value = "5")]
    polls: u32,
}

/// Sends one command as `GET /game/<cmd>/<args...>` and decodes the JSON body.
async fn send_command(server: &str, command: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(server).await?;
    let path = format!("/game/{}", command.split_whitespace().collect::<Vec<_>>().join("/"));
    let request = format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, server
    );
    stream.write_all(request.as_bytes()).await?;

    let mut data = Vec::new();
    stream.read_to_end(&mut data).await?;

    let header_end = data
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or("Invalid HTTP response")?;
    Ok(serde_json::from_slice(&data[header_end + 4..])?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    println!("Registering as {} on {}", args.color, args.server);
    let registration = send_command(&args.server, &format!("register_player {}", args.color)).await?;
    println!("Registration: {}", registration);

    let player_id = match registration["player_id"].as_str() {
        Some(id) => id.to_string(),
        None => {
            println!("Registration failed, nothing else to do");
            return Ok(());
        }
    };

    for i in 0..args.polls {
        let state = send_command(&args.server, "get_game_state").await?;
        let info = &state["game_info"];
        println!(
            "Poll {}: stage {}/{}, scores {}, stage winner {}, match winner {}, elapsed {:.1}s",
            i + 1,
            info["current_stage"],
            info["total_stages"],
            info["scores"],
            info["stage_winner"],
            info["match_winner"],
            info["elapsed_time"].as_f64().unwrap_or(0.0)
        );

        if let Some(gems) = state["gems"].as_array() {
            for gem in gems.iter().filter(|g| g["type"] == args.color.to_lowercase().as_str()) {
                println!("  Gem {} at ({}, {})", gem["id"], gem["x"], gem["y"]);
            }
        }

        let report = format!(
            "set_player_state {} {} {} {}",
            player_id,
            state["players"][&player_id]["x"],
            state["players"][&player_id]["y"],
            state["players"][&player_id]["lives"]
        );
        let ack = send_command(&args.server, &report).await?;
        println!("  Telemetry ack: {}", ack["status"]);

        sleep(Duration::from_secs(1)).await;
    }

    let exit = send_command(&args.server, &format!("player_at_exit {}", player_id)).await?;
    println!("Exit check: {}", exit);

    println!("Test client finished");
    Ok(())
}
