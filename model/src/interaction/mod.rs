mod application_command;
pub use application_command::{ApplicationCommand, CreateApplicationCommand};

mod application_command_type;
pub use application_command_type::ApplicationCommandType;

mod application_command_option;
pub use application_command_option::{ApplicationCommandOption, ApplicationCommandOptionType};

mod interaction_type;
pub use interaction_type::InteractionType;

mod interaction_response;
pub use interaction_response::{InteractionResponse, InteractionResponseType};

mod interaction_application_command_callback_data;
pub use interaction_application_command_callback_data::InteractionApplicationCommandCallbackData;
