use assert2::{assert, let_assert};
use contract_rpc::{ClientConfig, HttpTransport, NetworkAddress, ParamLocation, StaticResolver, Verb};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use macros_tests::{messages, Message, NewMessage};

fn message(id: u64, text: &str) -> Message {
	Message {
		id,
		author: "alice".into(),
		text: text.into(),
	}
}

fn resolver(server: &MockServer) -> StaticResolver {
	let_assert!(Ok(address) = NetworkAddress::parse(&server.uri()));
	StaticResolver::new().with_service("messages", address)
}

fn client(server: &MockServer, config: ClientConfig) -> messages::Client {
	let_assert!(Ok(client) = messages::Client::bind_with_config("messages", resolver(server), HttpTransport::new(), config));
	client
}

#[test]
fn descriptor() {
	let contract = messages::descriptor();
	assert!(contract.name() == "messages");
	assert!(contract.declared_media_type() == "application/json");
	assert!(let Ok(()) = contract.validate());

	let names: Vec<_> = contract.operations().iter().map(|operation| operation.name()).collect();
	assert!(names == ["list_messages", "get_message", "create_message", "update_message", "delete_message", "messages_by_author"]);

	let_assert!(Some(update) = contract.get("update_message"));
	assert!(update.verb() == Verb::Put);
	assert!(update.path() == "/messages/{id}");
	assert!(update.params().len() == 2);
	assert!(update.params()[0].name() == "id");
	assert!(update.params()[0].location() == ParamLocation::Path);
	assert!(update.params()[0].type_name() == "u64");
	let_assert!(Some(body) = update.body_param());
	assert!(body.name() == "message");
	assert!(body.type_name().ends_with("NewMessage"));
	assert!(update.return_type().ends_with("Message"));

	let_assert!(Some(delete) = contract.get("delete_message"));
	assert!(delete.return_type() == "()");
}

#[test]
fn bind_rejects_empty_service_name() {
	let_assert!(Err(e) = messages::Client::<contract_rpc::Json>::bind("", StaticResolver::new(), HttpTransport::new()));
	assert!(e.is_binding_error());
}

#[test]
fn handle_exposes_all_operations() {
	let_assert!(Ok(client) = messages::Client::<contract_rpc::Json>::bind("messages", StaticResolver::new(), HttpTransport::new()));
	assert!(client.handle().operations().len() == 6);
	assert!(client.handle().service_name().as_str() == "messages");
	assert!(let Some(_) = client.handle().operation("messages_by_author"));
}

#[tokio::test]
async fn list_messages() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/messages"))
		.and(query_param("limit", "2"))
		.and(header("accept", "application/json"))
		.respond_with(ResponseTemplate::new(200).set_body_json(vec![message(1, "hello"), message(2, "world")]))
		.expect(1)
		.mount(&server)
		.await;

	let client = client(&server, ClientConfig::default());
	let_assert!(Ok(messages) = client.list_messages(Some(2), None).await);
	assert!(messages == [message(1, "hello"), message(2, "world")]);
}

#[tokio::test]
async fn create_and_update_message() {
	let server = MockServer::start().await;
	let new = NewMessage {
		author: "alice".into(),
		text: "hello".into(),
	};

	Mock::given(method("POST"))
		.and(path("/messages"))
		.and(header("content-type", "application/json"))
		.and(body_json(&new))
		.respond_with(ResponseTemplate::new(201).set_body_json(message(7, "hello")))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("PUT"))
		.and(path("/messages/7"))
		.and(body_json(&new))
		.respond_with(ResponseTemplate::new(200).set_body_json(message(7, "hello")))
		.expect(1)
		.mount(&server)
		.await;

	let client = client(&server, ClientConfig::default());
	let_assert!(Ok(created) = client.create_message(&new).await);
	assert!(created == message(7, "hello"));
	let_assert!(Ok(updated) = client.update_message(created.id, &new).await);
	assert!(updated == created);
}

#[tokio::test]
async fn delete_message_without_response_body() {
	let server = MockServer::start().await;
	Mock::given(method("DELETE"))
		.and(path("/messages/3"))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;

	let client = client(&server, ClientConfig::default());
	assert!(let Ok(()) = client.delete_message(3).await);
}

#[tokio::test]
async fn path_values_are_percent_encoded() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/authors/alice%2Fbob/messages"))
		.respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Message>::new()))
		.expect(1)
		.mount(&server)
		.await;

	let client = client(&server, ClientConfig::default());
	let_assert!(Ok(messages) = client.messages_by_author("alice/bob".into()).await);
	assert!(messages.is_empty());
}

#[tokio::test]
async fn not_found() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/messages/404"))
		.respond_with(ResponseTemplate::new(404).set_body_string("no such message"))
		.mount(&server)
		.await;

	let strict = client(&server, ClientConfig::default());
	let_assert!(Err(e) = strict.get_message(404).await);
	assert!(e.remote_status() == Some(404));

	let lenient = client(&server, ClientConfig::default().decode_not_found(true));
	assert!(let Ok(None) = lenient.get_message(404).await);
}

#[tokio::test]
async fn server_error() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/messages/1"))
		.respond_with(ResponseTemplate::new(500).set_body_string("database on fire"))
		.mount(&server)
		.await;

	let client = client(&server, ClientConfig::default());
	let_assert!(Err(contract_rpc::InvokeError::Remote(e)) = client.get_message(1).await);
	assert!(e.status == 500);
	assert!(e.operation == "get_message");
	assert!(e.body_text() == Some("database on fire"));
}

#[tokio::test]
async fn mismatched_response() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/messages"))
		.respond_with(ResponseTemplate::new(200).set_body_string(r#"{"not":"a list"}"#))
		.mount(&server)
		.await;

	let client = client(&server, ClientConfig::default());
	let_assert!(Err(contract_rpc::InvokeError::Decoding(_)) = client.list_messages(None, None).await);
}

#[tokio::test]
async fn unknown_service() {
	let_assert!(Ok(client) = messages::Client::<contract_rpc::Json>::bind("messages", StaticResolver::new(), HttpTransport::new()));
	for _ in 0..2 {
		let_assert!(Err(contract_rpc::InvokeError::Resolution(e)) = client.get_message(1).await);
		assert!(e.service_name == "messages");
	}
}

#[tokio::test]
async fn default_headers() {
	let server = MockServer::start().await;
	Mock::given(method("DELETE"))
		.and(path("/messages/1"))
		.and(header("authorization", "Bearer secret"))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;

	let client = client(&server, ClientConfig::default().default_header("Authorization", "Bearer secret"));
	assert!(let Ok(()) = client.delete_message(1).await);
}
