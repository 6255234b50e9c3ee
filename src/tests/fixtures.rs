use serde_json::{json, Value};

use crate::{
	models::{
		NewActionConfiguration, NewActionSymbol, NewGenerationHistory, NewMultimediaApiConfig,
		NewQuickStoryboardConfig, NewSymbol, NewTransaction, NewUser, User,
	},
	repo::UserRepo,
	tests::test_utils::unique,
};
use diesel::PgConnection;

pub struct TestFixtures;

impl TestFixtures {
	pub fn valid_user_registration() -> Value {
		let name = unique("user");
		json!({
			"username": name,
			"email": format!("{}@example.com", name),
			"password": "SecurePassword123!",
		})
	}

	pub fn new_user(balance: f64) -> NewUser {
		let name = unique("user");
		NewUser {
			email: format!("{}@example.com", name),
			username: name,
			password: "not-a-real-hash".to_string(),
			balance: Some(balance),
		}
	}

	pub fn seed_user(conn: &mut PgConnection, balance: f64) -> User {
		UserRepo::create(conn, &Self::new_user(balance)).unwrap()
	}

	pub fn transaction(user_id: i32, kind: &str, amount: f64) -> NewTransaction {
		NewTransaction {
			user_id,
			kind: kind.to_string(),
			amount,
			description: Some(format!("Test {} transaction", kind)),
		}
	}

	pub fn symbol(user_id: i32, name: &str) -> NewSymbol {
		NewSymbol {
			id: None,
			user_id,
			icon: "*".to_string(),
			name: name.to_string(),
			description: format!("{} symbol", name),
		}
	}

	pub fn action_symbol(user_id: i32, name: &str) -> NewActionSymbol {
		NewActionSymbol {
			id: None,
			user_id,
			name: name.to_string(),
			icon: ">".to_string(),
			description: String::new(),
			prompt: format!("Apply {}", name),
		}
	}

	pub fn storyboard_config(user_id: i32, name: &str) -> NewQuickStoryboardConfig {
		NewQuickStoryboardConfig {
			id: None,
			user_id,
			name: name.to_string(),
			description: String::new(),
			story_template: "Tell a story about {topic}".to_string(),
			scene_template: "Scene: {scene}".to_string(),
			image_template: "Illustrate {scene}".to_string(),
			video_template: "Animate {scene}".to_string(),
		}
	}

	pub fn action_configuration(user_id: i32, name: &str) -> NewActionConfiguration {
		NewActionConfiguration {
			id: None,
			user_id,
			name: name.to_string(),
			description: String::new(),
			system_template: "You are a storyboard assistant".to_string(),
			user_template: "{input}".to_string(),
			image_template: "{image}".to_string(),
			video_template: "{video}".to_string(),
		}
	}

	pub fn generation(user_id: i32, kind: &str, images: &[&str], metadata: Value) -> NewGenerationHistory {
		NewGenerationHistory {
			id: None,
			user_id,
			kind: kind.to_string(),
			prompt: format!("Generate a {}", kind),
			images: images.iter().map(|image| image.to_string()).collect(),
			metadata,
		}
	}

	pub fn multimedia_config(user_id: i32, provider: &str) -> NewMultimediaApiConfig {
		NewMultimediaApiConfig { id: None, user_id, config: json!({ "provider": provider }) }
	}
}
