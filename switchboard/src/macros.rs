/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// ```rust
/// use switchboard::{Role, sb_msg};
///
/// let message = sb_msg!(assistant => "Done.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Done.");
/// ```
#[macro_export]
macro_rules! sb_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::System, $content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::User, $content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::Assistant, $content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use switchboard::{Role, sb_messages};
///
/// let messages = sb_messages![
///     system => "You are concise.",
///     user => "Explain this query.",
/// ];
///
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role, Role::System);
/// assert_eq!(messages[1].role, Role::User);
/// ```
#[macro_export]
macro_rules! sb_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::sb_msg!($role => $content)),+]
    };
}

/// Creates a [`ChatConfig`](crate::ChatConfig) with provider shorthand support.
///
/// ```rust
/// use switchboard::{ProviderKind, sb_config};
///
/// let config = sb_config!(gateway, "llama3", "Be concise.");
/// assert_eq!(config.provider.kind, ProviderKind::GatewayProxy);
/// assert_eq!(config.system_prompt.as_deref(), Some("Be concise."));
/// ```
#[macro_export]
macro_rules! sb_config {
    (direct, $model:expr $(,)?) => {
        $crate::util::chat_config($crate::ProviderKind::DirectEndpoint, $model)
    };
    (hosted, $model:expr $(,)?) => {
        $crate::util::chat_config($crate::ProviderKind::HostedInference, $model)
    };
    (gateway, $model:expr $(,)?) => {
        $crate::util::chat_config($crate::ProviderKind::GatewayProxy, $model)
    };
    (device, $model:expr $(,)?) => {
        $crate::util::chat_config($crate::ProviderKind::DeviceFlow, $model)
    };
    ($kind:expr, $model:expr $(,)?) => {
        $crate::util::chat_config($kind, $model)
    };
    (direct, $model:expr, $system_prompt:expr $(,)?) => {
        $crate::sb_config!(direct, $model).with_system_prompt($system_prompt)
    };
    (hosted, $model:expr, $system_prompt:expr $(,)?) => {
        $crate::sb_config!(hosted, $model).with_system_prompt($system_prompt)
    };
    (gateway, $model:expr, $system_prompt:expr $(,)?) => {
        $crate::sb_config!(gateway, $model).with_system_prompt($system_prompt)
    };
    (device, $model:expr, $system_prompt:expr $(,)?) => {
        $crate::sb_config!(device, $model).with_system_prompt($system_prompt)
    };
    ($kind:expr, $model:expr, $system_prompt:expr $(,)?) => {
        $crate::util::chat_config($kind, $model).with_system_prompt($system_prompt)
    };
}
