//! Signup form walkthrough: sanitization, rule chains, uniqueness checks
//! against a row-count store and message customization.

use fieldcheck::prelude::*;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("🚀 Fieldcheck Signup Example\n");

    // Rows already registered, backing the unique and exists rules
    let store = MemoryStore::new();
    store.insert("users", [("id", "1"), ("email", "taken@example.com")])?;
    store.insert("plans", [("id", "1"), ("name", "starter")])?;
    store.insert("plans", [("id", "2"), ("name", "team")])?;

    let spec = RuleSpec::new()
        .field("username", "required|regex:^[a-z0-9_]+$|min:3|max:20")
        .field("email", "required|email|unique:users,email")
        .field("password", "required|min:8|confirmed")
        .field("plan", "required|exists:plans,name")
        .field("website", "nullable|url")
        .field("birthday", "nullable|date");

    let mut validator = Validator::new().with_store(store);

    // A messy first attempt: markup in the username, a taken email, a
    // password too short to ever reach its mismatched confirmation.
    let submission: Input = serde_json::from_str(
        r#"{
            "username": "  <b>jo</b>  ",
            "email": "taken@example.com",
            "password": "secret",
            "password_confirmation": "secret!",
            "plan": "starter",
            "website": "not a url"
        }"#,
    )?;

    println!("📋 First attempt...\n");
    if !validator.validate(&submission, &spec)? {
        for (field, messages) in validator.errors().iter() {
            println!("❌ {}: {}", field, messages.join(" "));
        }
        println!(
            "\nError map as JSON:\n{}\n",
            serde_json::to_string_pretty(validator.errors())?
        );
    }

    // Swap in a friendlier template for one rule
    validator
        .messages_mut()
        .set("unique", "That :field is already registered.");

    println!("📋 Same attempt with a custom unique message...\n");
    validator.validate(&submission, &spec)?;
    if let Some(message) = validator.errors().first("email") {
        println!("❌ email: {}\n", message);
    }

    // A clean submission; the empty website skips its chain via nullable
    let submission: Input = serde_json::from_str(
        r#"{
            "username": "joanna84",
            "email": "joanna@example.com",
            "password": "correct horse battery",
            "password_confirmation": "correct horse battery",
            "plan": "team",
            "website": "",
            "birthday": "1984-02-29"
        }"#,
    )?;

    println!("📋 Clean submission...\n");
    if validator.validate(&submission, &spec)? {
        println!("✅ Signup accepted");
    }

    println!("\n✨ Example completed successfully!");

    Ok(())
}
