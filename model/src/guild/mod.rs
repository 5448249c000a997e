mod guild;
pub use guild::Guild;

mod role;
pub use role::Role;

mod member;
pub use member::Member;

mod unavailable_guild;
pub use unavailable_guild::UnavailableGuild;
