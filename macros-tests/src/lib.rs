use serde::{Deserialize, Serialize};

contract_rpc::contract! {
	/// The messages API.
	pub contract messages {
		/// List messages, optionally filtered by tag.
		operation list_messages: GET "/messages" (query limit: Option<u32>, query tag: Option<String>) -> Vec<Message>,

		/// Get a single message.
		operation get_message: GET "/messages/{id}" (path id: u64) -> Option<Message>,

		/// Create a new message.
		operation create_message: POST "/messages" (body message: NewMessage) -> Message,

		/// Replace the text of a message.
		operation update_message: PUT "/messages/{id}" (path id: u64, body message: NewMessage) -> Message,

		/// Delete a message.
		operation delete_message: DELETE "/messages/{id}" (path id: u64),

		operation messages_by_author: GET "/authors/{author}/messages" (path author: String) -> Vec<Message>,
	}
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
	pub id: u64,
	pub author: String,
	pub text: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
	pub author: String,
	pub text: String,
}
