use mcp_transport::prelude::*;
use rmcp::ServiceExt;

/// Example of building a transport from a config record and connecting to a server
#[tokio::main]
async fn main() -> mcp_transport::Result<()> {
    mcp_transport::load_env();
    init_logging(LogLevel::Info);

    println!("📡 MCP Transport Example\n");

    // e.g. `cargo run --example connect -- '{"transportType":"stdio","command":"npx","args":["@playwright/mcp"]}'`
    let json = std::env::args()
        .nth(1)
        .unwrap_or_else(|| r#"{"transportType":"stdio","command":"npx","args":["@playwright/mcp"]}"#.to_string());
    let request = TransportRequest::from_json(&json)?.with_tls_from_env();

    let channel = match create_transport(&request).await {
        Ok(channel) => channel,
        Err(e) => {
            println!("❌ {}", e);
            return Err(e);
        }
    };
    println!("✅ Created {} transport\n", channel.kind());

    match ().serve(channel).await {
        Ok(client) => {
            match client.list_all_tools().await {
                Ok(tools) => {
                    println!("Found {} tools:", tools.len());
                    for tool in &tools {
                        println!("  • {}", tool.name);
                    }
                }
                Err(e) => println!("Error listing tools: {}", e),
            }
            let _ = client.cancel().await;
        }
        Err(e) => println!("Handshake failed: {}", e),
    }

    Ok(())
}
