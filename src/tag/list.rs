//! The tags page, listing the user's category vocabulary per record kind.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserId, endpoints,
    html::{PAGE_CONTAINER_STYLE, TAG_BADGE_STYLE, base},
    navigation::NavBar,
};

use super::{Tag, TagKind, get_tags_by_kind};

/// The state needed for displaying the tags page.
#[derive(Debug, Clone)]
pub struct TagsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub user_id: UserId,
}

impl FromRef<AppState> for TagsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            user_id: state.user_id,
        }
    }
}

/// Display the user's tags, grouped by the kind of record they categorize.
pub async fn get_tags_page(State(state): State<TagsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let income_tags = get_tags_by_kind(state.user_id, TagKind::Income, &connection)?;
    let expense_tags = get_tags_by_kind(state.user_id, TagKind::Expense, &connection)?;
    let inventory_tags = get_tags_by_kind(state.user_id, TagKind::Inventory, &connection)?;

    Ok(tags_view(&income_tags, &expense_tags, &inventory_tags).into_response())
}

fn tags_view(income_tags: &[Tag], expense_tags: &[Tag], inventory_tags: &[Tag]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TAGS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-2" { "Tags" }

            p class="text-sm text-gray-600 dark:text-gray-400 mb-6 max-w-prose"
            {
                "Tags are created automatically the first time you use a new \
                category on a record."
            }

            (tag_section("Income categories", income_tags))
            (tag_section("Expense categories", expense_tags))
            (tag_section("Inventory categories", inventory_tags))
        }
    };

    base("Tags", &[], &content)
}

fn tag_section(title: &str, tags: &[Tag]) -> Markup {
    html! {
        section class="w-full max-w-2xl mb-6"
        {
            h2 class="text-lg font-semibold mb-2" { (title) }

            @if tags.is_empty() {
                p class="text-sm text-gray-500 dark:text-gray-400" { "No tags yet." }
            } @else {
                div class="flex flex-wrap gap-2"
                {
                    @for tag in tags {
                        span class=(TAG_BADGE_STYLE) { (tag.name) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tags_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        tag::{TagKind, TagName, ensure_tag},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{TagsPageState, get_tags_page};

    fn get_test_state() -> TagsPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        TagsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            user_id: 1,
        }
    }

    #[tokio::test]
    async fn renders_tags_grouped_by_kind() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            ensure_tag(1, TagKind::Income, &TagName::new_unchecked("Sales"), &connection).unwrap();
            ensure_tag(1, TagKind::Expense, &TagName::new_unchecked("Rent"), &connection).unwrap();
        }

        let response = get_tags_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.html();
        assert!(text.contains("Sales"));
        assert!(text.contains("Rent"));
    }

    #[tokio::test]
    async fn renders_empty_state_without_tags() {
        let state = get_test_state();

        let response = get_tags_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(html.html().contains("No tags yet."));
    }
}
