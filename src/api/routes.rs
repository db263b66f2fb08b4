//! API route configuration.

use crate::api::handlers::{
    accept_invitation_handler, add_institutions_handler, create_program_handler,
    delete_program_handler, get_program_handler, invitation_list_handler, invite_user_handler,
    program_list_handler, revoke_invitations_handler, term_list_handler, update_program_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `GET    /programs`                                  - List programs
/// - `POST   /programs`                                  - Register a program
/// - `GET    /programs/{short_name}`                     - Program with linked terms
/// - `PATCH  /programs/{short_name}`                     - Update fields and term links
/// - `DELETE /programs/{short_name}`                     - Remove a program
/// - `GET    /programs/{short_name}/invitations`         - List invitations
/// - `POST   /programs/{short_name}/invitations`         - Invite a user
/// - `DELETE /programs/{short_name}/invitations`         - Revoke invitations by id
/// - `POST   /programs/{short_name}/invitations/{id}/accept` - Accept an invitation
/// - `GET    /taxonomy/{kind}`                           - Terms with linked programs
/// - `POST   /taxonomy/institutions`                     - Register institutions
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/programs",
            get(program_list_handler).post(create_program_handler),
        )
        .route(
            "/programs/{short_name}",
            get(get_program_handler)
                .patch(update_program_handler)
                .delete(delete_program_handler),
        )
        .route(
            "/programs/{short_name}/invitations",
            get(invitation_list_handler)
                .post(invite_user_handler)
                .delete(revoke_invitations_handler),
        )
        .route(
            "/programs/{short_name}/invitations/{id}/accept",
            post(accept_invitation_handler),
        )
        .route(
            "/taxonomy/{kind}",
            get(term_list_handler).post(add_institutions_handler),
        )
}
