use std::time::Duration;

use clap::Parser;
use contract_rpc::{ClientConfig, FixedResolver, HttpTransport, NetworkAddress};
use serde::{Deserialize, Serialize};

contract_rpc::contract! {
	/// A small message board API.
	contract messages {
		/// List the most recent messages.
		operation list_messages: GET "/messages" (query limit: Option<u32>) -> Vec<Message>,

		/// Get a single message.
		operation get_message: GET "/messages/{id}" (path id: u64) -> Option<Message>,

		/// Post a new message.
		operation create_message: POST "/messages" (body message: NewMessage) -> Message,
	}
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
	id: u64,
	author: String,
	text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct NewMessage {
	author: String,
	text: String,
}

#[derive(Parser)]
struct Options {
	/// The base address of the messages service.
	#[clap(long, default_value = "http://localhost:8080")]
	address: String,

	/// Request timeout in seconds.
	#[clap(long)]
	timeout: Option<u64>,

	#[clap(subcommand)]
	command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
	/// List messages.
	List {
		#[clap(long)]
		limit: Option<u32>,
	},

	/// Show a single message.
	Get {
		id: u64,
	},

	/// Post a message.
	Post {
		author: String,
		text: String,
	},
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
	if let Err(e) = do_main(&Options::parse()).await {
		eprintln!("Error: {}", e);
		std::process::exit(1);
	}
}

async fn do_main(options: &Options) -> Result<(), String> {
	let address = NetworkAddress::parse(&options.address).map_err(|e| e.to_string())?;

	let mut config = ClientConfig::default().decode_not_found(true);
	if let Some(timeout) = options.timeout {
		config = config.timeout(Duration::from_secs(timeout));
	}

	// The fixed resolver sends every service name to the same address.
	let client: messages::Client = messages::Client::bind_with_config("messages", FixedResolver::new(address), HttpTransport::new(), config)
		.map_err(|e| format!("failed to bind client: {}", e))?;

	match &options.command {
		Command::List { limit } => {
			let messages = client.list_messages(*limit).await.map_err(|e| format!("failed to list messages: {}", e))?;
			for message in messages {
				println!("{}: <{}> {}", message.id, message.author, message.text);
			}
		},
		Command::Get { id } => match client.get_message(*id).await.map_err(|e| format!("failed to get message: {}", e))? {
			Some(message) => println!("{}: <{}> {}", message.id, message.author, message.text),
			None => eprintln!("No message with ID {}", id),
		},
		Command::Post { author, text } => {
			let message = NewMessage {
				author: author.clone(),
				text: text.clone(),
			};
			let message = client.create_message(&message).await.map_err(|e| format!("failed to post message: {}", e))?;
			println!("Posted message {}", message.id);
		},
	}

	Ok(())
}
