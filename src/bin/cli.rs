use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "packets")]
#[command(about = "A CLI tool for the packet service", long_about = None)]
struct Cli {
    #[arg(long, env = "API_URL", default_value = "http://localhost:4000", global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Create a category")]
    CreateCategory {
        #[arg(short, long, help = "Category name")]
        name: String,

        #[arg(short, long, help = "Category description")]
        description: String,

        #[arg(short, long, help = "Priority (0 or more)")]
        priority: u32,
    },

    #[command(about = "List categories")]
    Categories {
        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 10)]
        limit: u64,
    },

    #[command(about = "Create a packet")]
    CreatePacket {
        #[arg(short, long, help = "Packet name")]
        name: String,

        #[arg(short, long, help = "Packet description")]
        description: String,

        #[arg(short, long, help = "Packet status")]
        status: String,
    },

    #[command(about = "List packets")]
    Packets {
        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 10)]
        limit: u64,
    },

    #[command(about = "Attach a category to a packet")]
    Attach {
        #[arg(short, long, help = "Packet ID")]
        packet: String,

        #[arg(short, long, help = "Category ID")]
        category: String,
    },

    #[command(about = "Detach a category from a packet")]
    Detach {
        #[arg(short, long, help = "Packet ID")]
        packet: String,

        #[arg(short, long, help = "Category ID")]
        category: String,
    },

    #[command(about = "List packets in a category")]
    Search {
        #[arg(short, long, help = "Category ID")]
        category: String,

        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 10)]
        limit: u64,
    },

    #[command(about = "List available users")]
    Users {
        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 10)]
        limit: u64,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryRequest {
    name: String,
    description: String,
    priority: u32,
}

#[derive(Debug, Serialize)]
struct PacketRequest {
    name: String,
    description: String,
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Category {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    description: String,
    is_active: bool,
    priority: u32,
}

#[derive(Debug, Deserialize)]
struct Packet {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    status: String,
    // Either populated category objects or bare ids of deleted ones
    categories: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct User {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    email: String,
    phone: String,
    packets: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(alias = "totalCategories", alias = "totalPackets", alias = "totalUsers")]
    total: u64,
    total_pages: u64,
    current_page: u64,
    data: Vec<T>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_command(&cli.api_url, cli.command).await {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_command(api_url: &str, command: Commands) -> Result<()> {
    let client = reqwest::Client::new();

    match command {
        Commands::CreateCategory {
            name,
            description,
            priority,
        } => {
            let payload = CategoryRequest {
                name,
                description,
                priority,
            };
            let category: Category = send(
                client.post(format!("{}/api/categories", api_url)).json(&payload),
            )
            .await?;

            println!("✅ Category created successfully!");
            println!("   Name: {}", category.name);
            println!("   Priority: {}", category.priority);
            println!("   ID: {}", category.id);
        }
        Commands::Categories { page, limit } => {
            let result: Page<Category> = send(
                client
                    .get(format!("{}/api/categories", api_url))
                    .query(&[("page", page), ("limit", limit)]),
            )
            .await?;
            print_categories(result);
        }
        Commands::CreatePacket {
            name,
            description,
            status,
        } => {
            let payload = PacketRequest {
                name,
                description,
                status,
            };
            let packet: Packet =
                send(client.post(format!("{}/api/packets", api_url)).json(&payload)).await?;

            println!("✅ Packet created successfully!");
            println!("   Name: {}", packet.name);
            println!("   Status: {}", packet.status);
            println!("   ID: {}", packet.id);
        }
        Commands::Packets { page, limit } => {
            let result: Page<Packet> = send(
                client
                    .get(format!("{}/api/packets", api_url))
                    .query(&[("page", page), ("limit", limit)]),
            )
            .await?;
            print_packets(result);
        }
        Commands::Attach { packet, category } => {
            let packet: Packet = send(client.post(format!(
                "{}/api/packets/{}/categories/{}",
                api_url, packet, category
            )))
            .await?;
            println!("🏷️  {} now has {} categories", packet.name, packet.categories.len());
        }
        Commands::Detach { packet, category } => {
            let packet: Packet = send(client.delete(format!(
                "{}/api/packets/{}/categories/{}",
                api_url, packet, category
            )))
            .await?;
            println!("🏷️  {} now has {} categories", packet.name, packet.categories.len());
        }
        Commands::Search {
            category,
            page,
            limit,
        } => {
            let result: Page<Packet> = send(
                client
                    .get(format!("{}/api/packets/search/category/{}", api_url, category))
                    .query(&[("page", page), ("limit", limit)]),
            )
            .await?;
            print_packets(result);
        }
        Commands::Users { page, limit } => {
            let result: Page<User> = send(
                client
                    .get(format!("{}/api/users", api_url))
                    .query(&[("page", page), ("limit", limit)]),
            )
            .await?;
            print_users(result);
        }
    }

    Ok(())
}

async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request.send().await.context("Request failed")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        bail!("{}: {}", status, error_text);
    }

    response.json().await.context("Unexpected response body")
}

fn print_page_footer<T>(page: &Page<T>) {
    println!(
        "Page {} of {} ({} total)\n",
        page.current_page, page.total_pages, page.total
    );
}

fn print_categories(page: Page<Category>) {
    if page.data.is_empty() {
        println!("📭 No categories found.");
        return;
    }

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("ID"),
        Cell::new("Name"),
        Cell::new("Description"),
        Cell::new("Active"),
        Cell::new("Priority"),
    ]));

    for category in &page.data {
        table.add_row(Row::new(vec![
            Cell::new(&category.id),
            Cell::new(&category.name),
            Cell::new(&category.description),
            Cell::new(if category.is_active { "yes" } else { "no" }),
            Cell::new(&category.priority.to_string()),
        ]));
    }

    table.printstd();
    print_page_footer(&page);
}

fn print_packets(page: Page<Packet>) {
    if page.data.is_empty() {
        println!("📭 No packets found.");
        return;
    }

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("ID"),
        Cell::new("Name"),
        Cell::new("Status"),
        Cell::new("Categories"),
    ]));

    for packet in &page.data {
        let categories = packet
            .categories
            .iter()
            .map(|c| match c {
                Value::String(id) => format!("{} (deleted)", id),
                other => other["name"].as_str().unwrap_or("?").to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(Row::new(vec![
            Cell::new(&packet.id),
            Cell::new(&packet.name),
            Cell::new(&packet.status),
            Cell::new(&categories),
        ]));
    }

    table.printstd();
    print_page_footer(&page);
}

fn print_users(page: Page<User>) {
    if page.data.is_empty() {
        println!("📭 No users found.");
        return;
    }

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("ID"),
        Cell::new("Name"),
        Cell::new("Email"),
        Cell::new("Phone"),
        Cell::new("Packets"),
    ]));

    for user in &page.data {
        table.add_row(Row::new(vec![
            Cell::new(&user.id),
            Cell::new(&user.name),
            Cell::new(&user.email),
            Cell::new(&user.phone),
            Cell::new(&user.packets.len().to_string()),
        ]));
    }

    table.printstd();
    print_page_footer(&page);
}
