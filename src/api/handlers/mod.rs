//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod invitations;
pub mod programs;
pub mod taxonomy;

pub use health::health_handler;
pub use invitations::{
    accept_invitation_handler, invitation_list_handler, invite_user_handler,
    revoke_invitations_handler,
};
pub use programs::{
    create_program_handler, delete_program_handler, get_program_handler, program_list_handler,
    update_program_handler,
};
pub use taxonomy::{add_institutions_handler, term_list_handler};
