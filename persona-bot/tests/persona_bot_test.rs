//! Persona bot chain driven end to end with fake messages, a fake generator and a recording Bot.
//! BDD style: each test documents scenario and expected outcome.
//!
//! External interactions: none (FakeGenerator replaces the model, RecordingBot replaces Telegram).

use async_trait::async_trait;
use persona_bot::handlers::{HELP_TEXT, REPLY_USAGE, START_TEXT};
use persona_bot::{build_persona_chain, ChatEngine, PersonaSelector, FALLBACK_REPLY};
use rbot_core::{Bot, Chat, HandlerResponse, Message, User};
use rbot_telegram::dispatch_message;
use std::sync::{Arc, Mutex};
use text_generation::{Completion, GenerationError, GenerationRequest, TextGenerator};
use tokio::sync::RwLock;

#[derive(Clone, Copy)]
enum Mode {
    /// Completion echoes the prompt, then "reply to <user text>".
    Echo,
    InvalidInput,
    ModelFailure,
}

struct FakeGenerator {
    mode: Mode,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeGenerator {
    fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Completion, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.mode {
            Mode::Echo => {
                let prompt = format!("<sys>{}</sys><user>{}</user>", request.system_prompt, request.user_prompt);
                Ok(Completion {
                    text: format!("{}reply to {}", prompt, request.user_prompt),
                    prompt,
                })
            }
            Mode::InvalidInput => Err(GenerationError::InvalidInput(
                "Input length of input_ids is 300, but max_length is set to 128".to_string(),
            )),
            Mode::ModelFailure => Err(GenerationError::Model("shape mismatch".to_string())),
        }
    }
}

#[derive(Default)]
struct RecordingBot {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, _chat: &Chat, text: &str) -> rbot_core::Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct Harness {
    generator: Arc<FakeGenerator>,
    personas: PersonaSelector,
    chain: handler_chain::HandlerChain,
}

fn harness(mode: Mode) -> Harness {
    let generator = FakeGenerator::new(mode);
    let personas = PersonaSelector::new(vec!["@a".to_string(), "@b".to_string()], Some("@a")).unwrap();
    let engine = ChatEngine::new(generator.clone());
    let bot_username = Arc::new(RwLock::new(Some("persona_bot".to_string())));
    let chain = build_persona_chain(engine, personas.clone(), bot_username);
    Harness {
        generator,
        personas,
        chain,
    }
}

fn text(content: &str) -> Message {
    Message::incoming_text(
        "10",
        User {
            id: 7,
            username: Some("alice".to_string()),
        },
        Chat { id: 42 },
        content,
    )
}

async fn reply_of(h: &Harness, content: &str) -> String {
    match h.chain.handle(&text(content)).await.unwrap() {
        HandlerResponse::Reply(t) => t,
        other => panic!("expected a reply, got {:?}", other),
    }
}

/// **Test: /role @b switches the persona; the next text is generated with "You act like a @b.".**
#[tokio::test]
async fn role_change_flows_into_system_prompt() {
    let h = harness(Mode::Echo);

    let reply = reply_of(&h, "/role @b").await;
    assert!(reply.contains("Role has been changed to: @b"));

    let reply = reply_of(&h, "hi").await;
    assert_eq!(reply, "[b]\nreply to hi");

    let requests = h.generator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system_prompt, "You act like a @b.");
    assert_eq!(requests[0].user_prompt, "hi");
    assert_eq!(requests[0].max_tokens, 128);
}

/// **Test: /role @z is rejected with the allow-list and the persona stays @a.**
#[tokio::test]
async fn invalid_role_keeps_persona() {
    let h = harness(Mode::Echo);

    let reply = reply_of(&h, "/role @z").await;
    assert!(reply.contains("Invalid role. Allowed roles are: @a, @b"));
    assert_eq!(h.personas.current().await, "@a");
}

/// **Test: casing variants of an allowed persona succeed and reach the system prompt in canonical form.**
#[tokio::test]
async fn role_is_case_insensitive() {
    let h = harness(Mode::Echo);

    assert_eq!(reply_of(&h, "/ROLE @B").await, "Role has been changed to: @b");
    reply_of(&h, "hello").await;
    assert_eq!(h.generator.requests()[0].system_prompt, "You act like a @b.");
}

/// **Test: /role without an argument answers with instructions and never changes the persona.**
#[tokio::test]
async fn role_without_argument_does_not_mutate() {
    let h = harness(Mode::Echo);
    h.personas.set_persona("@b").await.unwrap();

    let reply = reply_of(&h, "/role").await;
    assert_eq!(reply, "Please provide a role. Allowed roles: @a, @b");
    assert_eq!(h.personas.current().await, "@b");
    assert!(h.generator.requests().is_empty());
}

/// **Test: /role uses only its first argument.**
#[tokio::test]
async fn role_uses_first_argument() {
    let h = harness(Mode::Echo);
    assert_eq!(reply_of(&h, "/role @b @a").await, "Role has been changed to: @b");
    assert_eq!(h.personas.current().await, "@b");
}

/// **Test: /role addressed to this bot by username works.**
#[tokio::test]
async fn role_with_bot_mention() {
    let h = harness(Mode::Echo);
    assert_eq!(
        reply_of(&h, "/role@persona_bot @b").await,
        "Role has been changed to: @b"
    );
}

/// **Test: /start and /help have fixed replies; /help lists every command.**
#[tokio::test]
async fn start_and_help() {
    let h = harness(Mode::Echo);
    assert_eq!(reply_of(&h, "/start").await, START_TEXT);
    let help = reply_of(&h, "/help").await;
    assert_eq!(help, HELP_TEXT);
    for cmd in ["/start", "/help", "/role", "/reply"] {
        assert!(help.contains(cmd), "help lists {}", cmd);
    }
    assert!(h.generator.requests().is_empty());
}

/// **Test: the model's value-validation failure becomes exactly the fallback text, labelled.**
#[tokio::test]
async fn invalid_input_yields_fallback() {
    let h = harness(Mode::InvalidInput);
    assert_eq!(
        reply_of(&h, "a very long message").await,
        format!("[a]\n{}", FALLBACK_REPLY)
    );
}

/// **Test: other generation failures are errors for that update, and nothing is sent.**
#[tokio::test]
async fn model_failure_is_an_error() {
    let h = harness(Mode::ModelFailure);
    let bot = RecordingBot::default();

    let result = dispatch_message(&h.chain, &bot, &text("hi")).await;

    assert!(result.is_err());
    assert!(bot.sent.lock().unwrap().is_empty());
}

/// **Test: /reply answers the replied-to text; without one it explains usage.**
#[tokio::test]
async fn reply_command() {
    let h = harness(Mode::Echo);

    let msg = text("/reply").replying_to("9", Some("what's for lunch?".to_string()));
    let response = h.chain.handle(&msg).await.unwrap();
    assert_eq!(
        response,
        HandlerResponse::Reply("[a]\nreply to what's for lunch?".to_string())
    );
    assert_eq!(h.generator.requests()[0].user_prompt, "what's for lunch?");

    assert_eq!(reply_of(&h, "/reply").await, REPLY_USAGE);
    let no_text = text("/reply").replying_to("9", None);
    assert_eq!(
        h.chain.handle(&no_text).await.unwrap(),
        HandlerResponse::Reply(REPLY_USAGE.to_string())
    );
}

/// **Test: unknown commands fall through to generation like any other text.**
#[tokio::test]
async fn unknown_command_is_generated() {
    let h = harness(Mode::Echo);
    assert_eq!(reply_of(&h, "/lunch").await, "[a]\nreply to /lunch");
    assert_eq!(h.generator.requests()[0].user_prompt, "/lunch");
}

/// **Test: the runner sends the generated reply to the chat; output never starts with the prompt.**
#[tokio::test]
async fn dispatch_sends_reply_without_prompt_echo() {
    let h = harness(Mode::Echo);
    let bot = RecordingBot::default();

    dispatch_message(&h.chain, &bot, &text("hi")).await.unwrap();

    let sent = bot.sent.lock().unwrap();
    assert_eq!(sent.as_slice(), &["[a]\nreply to hi".to_string()]);
    assert!(!sent[0].contains("<sys>"));
}
