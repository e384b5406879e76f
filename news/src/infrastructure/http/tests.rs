use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use bulletin_common::infrastructure::memory::{MemorySessionRepository, MemoryUserRepository};
use bulletin_common::test_utils::{seed_user, session_cookie_header};
use bulletin_common::{LOGIN_PATH, LOGOUT_PATH, SIGNUP_PATH, User};
use chrono::{Days, NaiveDate, TimeDelta, Utc};
use serde_json::Value;

use crate::domain::moderation::{BAD_WORDS, CommentFields, WARNING};
use crate::domain::{Comment, CommentRepository, NEWS_COUNT_ON_HOME_PAGE, News};
use crate::infrastructure::AppStateImpl;
use crate::infrastructure::http::{comments_location, news_detail_path, router};
use crate::infrastructure::memory::{MemoryCommentRepository, MemoryNewsRepository};

type TestState = AppStateImpl<
    MemoryUserRepository,
    MemorySessionRepository,
    MemoryNewsRepository,
    MemoryCommentRepository,
>;

const COMMENT_TEXT: &str = "Текст комментария";
const NEW_COMMENT_TEXT: &str = "Новый текст комментария";

struct Fixture {
    server: TestServer,
    sessions: MemorySessionRepository,
    news_repository: MemoryNewsRepository,
    comments: MemoryCommentRepository,
    author: User,
    not_author: User,
    news: News,
}

impl Fixture {
    async fn new() -> Self {
        let users = MemoryUserRepository::new();
        let sessions = MemorySessionRepository::new();
        let news_repository = MemoryNewsRepository::new();
        let comments = MemoryCommentRepository::new();

        let author = seed_user(&users, "Автор").await;
        let not_author = seed_user(&users, "Не автор").await;
        let news = news_repository
            .insert("Название новости", "Текст новости", today())
            .await;

        let state: TestState = AppStateImpl::new(
            users,
            sessions.clone(),
            news_repository.clone(),
            comments.clone(),
            NEWS_COUNT_ON_HOME_PAGE,
        );
        let server = TestServer::new(router(state)).unwrap();

        Self {
            server,
            sessions,
            news_repository,
            comments,
            author,
            not_author,
            news,
        }
    }

    async fn login(&self, user: &User) -> (HeaderName, HeaderValue) {
        session_cookie_header(&self.sessions, user).await
    }

    async fn comment(&self) -> Comment {
        self.comments
            .create(self.news.id, self.author.id, COMMENT_TEXT.to_string())
            .await
            .unwrap()
    }

    fn detail_url(&self) -> String {
        news_detail_path(self.news.id)
    }

    fn comments_url(&self) -> String {
        comments_location(self.news.id)
    }

    async fn comment_count(&self) -> usize {
        self.comments.count().await
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn edit_url(comment: &Comment) -> String {
    format!("/edit_comment/{}/", comment.id.0)
}

fn delete_url(comment: &Comment) -> String {
    format!("/delete_comment/{}/", comment.id.0)
}

#[tokio::test]
async fn home_shows_page_size_newest_first() {
    let fixture = Fixture::new().await;
    // the fixture news is dated today as well, ten more go back in time
    for index in 1..=NEWS_COUNT_ON_HOME_PAGE as u64 {
        fixture
            .news_repository
            .insert(
                &format!("Новость {}", index),
                "Просто текст.",
                today() - Days::new(index),
            )
            .await;
    }

    let response = fixture.server.get("/").await;

    response.assert_status_ok();
    let page: Value = response.json();
    let object_list = page["object_list"].as_array().unwrap();
    assert_eq!(object_list.len(), NEWS_COUNT_ON_HOME_PAGE);

    let dates: Vec<NaiveDate> = object_list
        .iter()
        .map(|news| news["date"].as_str().unwrap().parse().unwrap())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
    assert_eq!(dates[0], today());
}

#[tokio::test]
async fn home_shows_everything_when_short_of_a_page() {
    let fixture = Fixture::new().await;

    let page: Value = fixture.server.get("/").await.json();

    assert_eq!(page["object_list"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn thread_is_ordered_by_created() {
    let fixture = Fixture::new().await;
    let now = Utc::now();
    for index in 0..NEWS_COUNT_ON_HOME_PAGE as i64 + 1 {
        let comment = fixture
            .comments
            .create(fixture.news.id, fixture.author.id, format!("Tекст {}", index))
            .await
            .unwrap();
        // later comments are backdated further, against insertion order
        fixture
            .comments
            .set_created(comment.id, now - TimeDelta::days(index))
            .await;
    }

    let page: Value = fixture.server.get(&fixture.detail_url()).await.json();

    let created: Vec<String> = page["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|comment| comment["created"].as_str().unwrap().to_string())
        .collect();
    let created: Vec<chrono::DateTime<Utc>> =
        created.iter().map(|value| value.parse().unwrap()).collect();
    assert_eq!(created.len(), NEWS_COUNT_ON_HOME_PAGE + 1);
    assert!(created.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(page["comments"][0]["text"], format!("Tекст {}", NEWS_COUNT_ON_HOME_PAGE));
}

#[tokio::test]
async fn anonymous_client_has_no_form() {
    let fixture = Fixture::new().await;

    let page: Value = fixture.server.get(&fixture.detail_url()).await.json();

    assert!(page.get("news").is_some());
    assert!(page.get("form").is_none());
}

#[tokio::test]
async fn authorized_client_has_form() {
    let fixture = Fixture::new().await;
    let (name, value) = fixture.login(&fixture.author).await;

    let page: Value = fixture
        .server
        .get(&fixture.detail_url())
        .add_header(name, value)
        .await
        .json();

    assert_eq!(page["form"]["fields"]["text"], "");
}

#[tokio::test]
async fn public_pages_are_available_to_anonymous() {
    let fixture = Fixture::new().await;
    let detail_url = fixture.detail_url();

    for url in ["/", detail_url.as_str(), LOGIN_PATH, LOGOUT_PATH, SIGNUP_PATH] {
        let response = fixture.server.get(url).await;
        assert_eq!(response.status_code(), StatusCode::OK, "{}", url);
    }
}

#[tokio::test]
async fn missing_news_is_not_found() {
    let fixture = Fixture::new().await;

    let response = fixture.server.get("/news/999/").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = fixture.server.get("/news/abc/").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_and_delete_pages_depend_on_authorship() {
    let fixture = Fixture::new().await;
    let comment = fixture.comment().await;

    let cases = [
        (&fixture.author, StatusCode::OK),
        (&fixture.not_author, StatusCode::NOT_FOUND),
    ];
    for (user, status) in cases {
        let (name, value) = fixture.login(user).await;
        for url in [edit_url(&comment), delete_url(&comment)] {
            let response = fixture
                .server
                .get(&url)
                .add_header(name.clone(), value.clone())
                .await;
            assert_eq!(response.status_code(), status, "{} as {}", url, user.username);
        }
    }
}

#[tokio::test]
async fn anonymous_is_redirected_to_login() {
    let fixture = Fixture::new().await;
    let comment = fixture.comment().await;

    for url in [edit_url(&comment), delete_url(&comment)] {
        let response = fixture.server.get(&url).await;
        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), format!("{}?next={}", LOGIN_PATH, url));
    }
}

#[tokio::test]
async fn anonymous_user_cant_create_comment() {
    let fixture = Fixture::new().await;
    let url = fixture.detail_url();

    let response = fixture
        .server
        .post(&url)
        .form(&CommentFields::new(NEW_COMMENT_TEXT))
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), format!("{}?next={}", LOGIN_PATH, url));
    assert_eq!(fixture.comment_count().await, 0);
}

#[tokio::test]
async fn user_can_create_comment() {
    let fixture = Fixture::new().await;
    let (name, value) = fixture.login(&fixture.author).await;

    let response = fixture
        .server
        .post(&fixture.detail_url())
        .add_header(name, value)
        .form(&CommentFields::new(NEW_COMMENT_TEXT))
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), fixture.comments_url());
    assert_eq!(fixture.comment_count().await, 1);

    let thread = fixture.comments.list_for_news(fixture.news.id).await.unwrap();
    assert_eq!(thread[0].text, NEW_COMMENT_TEXT);
    assert_eq!(thread[0].news_id, fixture.news.id);
    assert_eq!(thread[0].author, fixture.author.id);
}

#[tokio::test]
async fn user_cant_use_bad_words() {
    let fixture = Fixture::new().await;
    let (name, value) = fixture.login(&fixture.author).await;
    let text = format!("Какой-то текст, {}, еще текст", BAD_WORDS[0]);

    let response = fixture
        .server
        .post(&fixture.detail_url())
        .add_header(name, value)
        .form(&CommentFields::new(text.as_str()))
        .await;

    response.assert_status_ok();
    let page: Value = response.json();
    assert_eq!(page["form"]["errors"]["text"][0], WARNING);
    assert_eq!(page["form"]["fields"]["text"], text);
    assert_eq!(fixture.comment_count().await, 0);
}

#[tokio::test]
async fn author_can_delete_comment() {
    let fixture = Fixture::new().await;
    let comment = fixture.comment().await;
    let (name, value) = fixture.login(&fixture.author).await;

    let response = fixture
        .server
        .delete(&delete_url(&comment))
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), fixture.comments_url());
    assert_eq!(fixture.comment_count().await, 0);
}

#[tokio::test]
async fn author_can_delete_comment_with_form_post() {
    let fixture = Fixture::new().await;
    let comment = fixture.comment().await;
    let (name, value) = fixture.login(&fixture.author).await;

    let response = fixture
        .server
        .post(&delete_url(&comment))
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(fixture.comment_count().await, 0);
}

#[tokio::test]
async fn user_cant_delete_comment_of_another_user() {
    let fixture = Fixture::new().await;
    let comment = fixture.comment().await;
    let (name, value) = fixture.login(&fixture.not_author).await;

    let response = fixture
        .server
        .post(&delete_url(&comment))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = fixture
        .server
        .delete(&delete_url(&comment))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    assert_eq!(fixture.comment_count().await, 1);
}

#[tokio::test]
async fn author_can_edit_comment() {
    let fixture = Fixture::new().await;
    let comment = fixture.comment().await;
    let (name, value) = fixture.login(&fixture.author).await;

    let response = fixture
        .server
        .post(&edit_url(&comment))
        .add_header(name, value)
        .form(&CommentFields::new(NEW_COMMENT_TEXT))
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), fixture.comments_url());
    let updated = fixture.comments.find_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(updated.text, NEW_COMMENT_TEXT);
    assert_eq!(updated.created, comment.created);
}

#[tokio::test]
async fn edit_is_moderated_too() {
    let fixture = Fixture::new().await;
    let comment = fixture.comment().await;
    let (name, value) = fixture.login(&fixture.author).await;

    let response = fixture
        .server
        .post(&edit_url(&comment))
        .add_header(name, value)
        .form(&CommentFields::new(BAD_WORDS[1]))
        .await;

    response.assert_status_ok();
    let page: Value = response.json();
    assert_eq!(page["form"]["errors"]["text"][0], WARNING);
    let stored = fixture.comments.find_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(stored.text, COMMENT_TEXT);
}

#[tokio::test]
async fn user_cant_edit_comment_of_another_user() {
    let fixture = Fixture::new().await;
    let comment = fixture.comment().await;
    let (name, value) = fixture.login(&fixture.not_author).await;

    let response = fixture
        .server
        .post(&edit_url(&comment))
        .add_header(name, value)
        .form(&CommentFields::new(NEW_COMMENT_TEXT))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let stored = fixture.comments.find_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(stored.text, COMMENT_TEXT);
}

#[tokio::test]
async fn foreign_comment_is_not_found_before_body_is_read() {
    let fixture = Fixture::new().await;
    let comment = fixture.comment().await;

    let cases = [
        (&fixture.not_author, StatusCode::NOT_FOUND),
        (&fixture.author, StatusCode::UNSUPPORTED_MEDIA_TYPE),
    ];
    for (user, status) in cases {
        let (name, value) = fixture.login(user).await;
        let response = fixture
            .server
            .post(&edit_url(&comment))
            .add_header(name, value)
            .await;
        assert_eq!(response.status_code(), status, "{}", user.username);
    }

    let stored = fixture.comments.find_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(stored.text, COMMENT_TEXT);
}

#[tokio::test]
async fn comment_on_missing_news_is_not_found_without_body() {
    let fixture = Fixture::new().await;
    let (name, value) = fixture.login(&fixture.author).await;

    let response = fixture
        .server
        .post("/news/999/")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(fixture.comment_count().await, 0);
}
