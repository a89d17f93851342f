use std::sync::Arc;
use weft_ioc::{Container, Parameter, TypeDescriptor, TypeRegistry, Value};

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

// --- Consumers ---
struct Newsletter {
  sender: Arc<dyn MessageSender>,
}

struct TwoFactorAuth {
  sender: Arc<dyn MessageSender>,
}

fn main() {
  // --- Type Descriptions ---
  let types = TypeRegistry::new()
    .with(TypeDescriptor::interface("MessageSender"))
    .with(TypeDescriptor::class("EmailSender", |_| {
      Ok(Value::from_arc::<dyn MessageSender>(Arc::new(EmailSender)))
    }))
    .with(TypeDescriptor::class("SmsSender", |_| {
      Ok(Value::from_arc::<dyn MessageSender>(Arc::new(SmsSender)))
    }))
    .with(
      TypeDescriptor::class("Newsletter", |args| {
        Ok(Value::new(Newsletter {
          sender: args.get::<dyn MessageSender>("sender")?,
        }))
      })
      .with_parameter(Parameter::named("sender", "MessageSender")),
    )
    .with(
      TypeDescriptor::class("TwoFactorAuth", |args| {
        Ok(Value::new(TwoFactorAuth {
          sender: args.get::<dyn MessageSender>("sender")?,
        }))
      })
      .with_parameter(Parameter::named("sender", "MessageSender")),
    );

  // --- Registration ---
  // Email by default, but two-factor codes go out by SMS.
  let container = Container::with_reflector(types);
  container.singleton("MessageSender", "EmailSender");
  container
    .when("TwoFactorAuth")
    .needs("MessageSender")
    .give("SmsSender")
    .expect("contextual binding is complete");

  // --- Resolution ---
  let newsletter = container.make_as::<Newsletter>("Newsletter").unwrap();
  let two_factor = container.make_as::<TwoFactorAuth>("TwoFactorAuth").unwrap();

  let result1 = newsletter.sender.send("test@example.com", "Hello from Weft!");
  let result2 = two_factor.sender.send("+123456789", "Your code is 123456");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));
}
