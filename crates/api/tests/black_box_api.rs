use chatop_api::config::{ApiConfig, BootstrapAdmin};
use chatop_auth::{AuthorizationPolicy, AuthorizationRule, CredentialVerifier, Role, SigningKey};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

const SECRET: &str = "black-box-test-secret";
const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    async fn spawn_with(customize: impl FnOnce(&mut ApiConfig)) -> Self {
        let mut config = ApiConfig::new(SigningKey::from_bytes(SECRET.as_bytes().to_vec()).unwrap()).unwrap();
        config.passwords = CredentialVerifier::new(4).unwrap();
        config.bootstrap_admin = Some(BootstrapAdmin {
            email: ADMIN_EMAIL.to_string(),
            name: "Admin".to_string(),
            password: ADMIN_PASSWORD.to_string(),
        });
        customize(&mut config);

        // Same router as prod, bound to an ephemeral port.
        let app = chatop_api::app::build_app(&config).await.expect("app builds");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    async fn token_for(&self, email: &str, password: &str) -> String {
        let res = self.login(email, password).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let res = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    async fn me(&self, token: &str) -> Value {
        let res = self
            .client
            .get(self.url("/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(secret: &str, subject: &str, role: &str, issued_ago: ChronoDuration) -> String {
    let iat = Utc::now() - issued_ago;
    let claims = json!({
        "sub": subject,
        "role": role,
        "iat": iat.timestamp(),
        "exp": (iat + ChronoDuration::hours(1)).timestamp(),
    });

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn error_body(res: reqwest::Response) -> (StatusCode, Value) {
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn public_routes_need_no_header() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Reaches the handler: a policy rejection would be 401 "authentication required".
    let (status, body) = error_body(srv.login("nobody@example.com", "pw").await).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid email or password");
}

#[tokio::test]
async fn unreadable_bodies_get_json_errors() {
    let srv = TestServer::spawn().await;
    let token = srv.register("Frank", "frank@example.com", "frank-pw").await;

    let cases = [
        ("/api/auth/login", "{not json", Some("application/json"), StatusCode::BAD_REQUEST),
        ("/api/auth/register", r#"{"email":"x@example.com"}"#, Some("application/json"), StatusCode::UNPROCESSABLE_ENTITY),
        ("/api/auth/login", r#"{"email":"a","password":"b"}"#, None, StatusCode::UNSUPPORTED_MEDIA_TYPE),
        ("/api/rentals", r#"{"name":"Loft","surface":"big"}"#, Some("application/json"), StatusCode::UNPROCESSABLE_ENTITY),
        ("/api/messages", "[", Some("application/json"), StatusCode::BAD_REQUEST),
    ];

    for (path, body, content_type, expected) in cases {
        let mut req = srv.client.post(srv.url(path)).bearer_auth(&token).body(body);
        if let Some(content_type) = content_type {
            req = req.header("Content-Type", content_type);
        }
        let res = req.send().await.unwrap();
        assert_eq!(res.status(), expected, "{path} {body}");

        let body: Value = res.json().await.expect("error body is JSON");
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()), "{path}: {body}");
    }
}

#[tokio::test]
async fn protected_routes_reject_missing_or_garbage_tokens() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/api/rentals")).send().await.unwrap();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authentication required");

    let res = srv
        .client
        .get(srv.url("/api/rentals"))
        .header("Authorization", "Bearer garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .get(srv.url("/api/auth/me"))
        .header("Authorization", "Basic YWxpY2U6cHc=")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unverifiable_tokens_are_anonymous() {
    let srv = TestServer::spawn().await;

    let live = mint_jwt(SECRET, ADMIN_EMAIL, "ADMIN", ChronoDuration::zero());
    let expired = mint_jwt(SECRET, ADMIN_EMAIL, "ADMIN", ChronoDuration::hours(2));
    let foreign = mint_jwt("some-other-secret", ADMIN_EMAIL, "ADMIN", ChronoDuration::zero());
    let unknown_role = mint_jwt(SECRET, ADMIN_EMAIL, "ROOT", ChronoDuration::zero());

    let res = srv.client.get(srv.url("/api/rentals")).bearer_auth(&live).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    for token in [expired, foreign, unknown_role] {
        let res = srv
            .client
            .get(srv.url("/api/rentals"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn admin_routes_follow_role_claim() {
    let srv = TestServer::spawn().await;
    let user_token = srv.register("Alice", "alice@example.com", "alice-pw").await;
    let admin_token = srv.token_for(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let alice_id = srv.me(&user_token).await["id"].as_i64().unwrap();

    let res = srv
        .client
        .put(srv.url(&format!("/api/admin/users/{alice_id}/role")))
        .bearer_auth(&user_token)
        .json(&json!({ "role": "ADMIN" }))
        .send()
        .await
        .unwrap();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "insufficient role");

    let res = srv
        .client
        .put(srv.url(&format!("/api/admin/users/{alice_id}/role")))
        .bearer_auth(&admin_token)
        .json(&json!({ "role": "ADMIN" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["role"], "ADMIN");

    // Already-issued token keeps its USER role; a fresh login carries ADMIN.
    let res = srv
        .client
        .put(srv.url(&format!("/api/admin/users/{alice_id}/role")))
        .bearer_auth(&user_token)
        .json(&json!({ "role": "USER" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let promoted = srv.token_for("alice@example.com", "alice-pw").await;
    assert_eq!(srv.me(&promoted).await["role"], "ADMIN");

    let res = srv
        .client
        .put(srv.url("/api/admin/users/999/role"))
        .bearer_auth(&admin_token)
        .json(&json!({ "role": "USER" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn roles_are_not_hierarchical() {
    let srv = TestServer::spawn_with(|config| {
        config.policy = Arc::new(
            AuthorizationPolicy::new(vec![
                AuthorizationRule::public("/api/auth/**"),
                AuthorizationRule::with_roles("/api/auth/me", [Role::User]),
                AuthorizationRule::with_roles("/api/rentals/**", [Role::User]),
            ])
            .unwrap(),
        );
    })
    .await;

    let admin_token = srv.token_for(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let res = srv
        .client
        .get(srv.url("/api/rentals"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let user_token = srv.register("Bob", "bob@example.com", "bob-pw").await;
    let res = srv
        .client
        .get(srv.url("/api/rentals"))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let srv = TestServer::spawn().await;
    srv.register("Carol", "carol@example.com", "carol-pw").await;

    let first = error_body(srv.login("carol@example.com", "wrong").await).await;
    let second = error_body(srv.login("carol@example.com", "wrong").await).await;
    let unknown = error_body(srv.login("nobody@example.com", "wrong").await).await;

    assert_eq!(first.0, StatusCode::UNAUTHORIZED);
    assert_eq!(first, second);
    assert_eq!(first, unknown);
}

#[tokio::test]
async fn register_login_and_me() {
    let srv = TestServer::spawn().await;
    let registered = srv.register("Dave", "dave@example.com", "dave-pw").await;
    let logged_in = srv.token_for("dave@example.com", "dave-pw").await;

    let me = srv.me(&registered).await;
    assert_eq!(me["email"], "dave@example.com");
    assert_eq!(me["name"], "Dave");
    assert_eq!(me["role"], "USER");
    assert!(me.get("password_hash").is_none());
    assert_eq!(srv.me(&logged_in).await["id"], me["id"]);

    let res = srv
        .client
        .get(srv.url(&format!("/api/user/{}", me["id"])))
        .bearer_auth(&logged_in)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let profile: Value = res.json().await.unwrap();
    assert_eq!(profile["email"], "dave@example.com");

    let res = srv
        .client
        .post(srv.url("/api/auth/register"))
        .json(&json!({ "name": "Dave 2", "email": "dave@example.com", "password": "x" }))
        .send()
        .await
        .unwrap();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email already registered: dave@example.com");

    let res = srv
        .client
        .post(srv.url("/api/auth/register"))
        .json(&json!({ "name": "Eve", "email": "not-an-email", "password": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rental_lifecycle_enforces_ownership() {
    let srv = TestServer::spawn().await;
    let owner = srv.register("Owner", "owner@example.com", "owner-pw").await;
    let other = srv.register("Other", "other@example.com", "other-pw").await;

    let res = srv
        .client
        .post(srv.url("/api/rentals"))
        .bearer_auth(&owner)
        .json(&json!({
            "name": "Seaside flat",
            "surface": 55,
            "price": 1200,
            "picture": "https://img.example.com/flat.jpg",
            "description": "Sea view"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Rental created !");

    let res = srv.client.get(srv.url("/api/rentals")).bearer_auth(&other).send().await.unwrap();
    let list: Value = res.json().await.unwrap();
    let rentals = list["rentals"].as_array().unwrap();
    assert_eq!(rentals.len(), 1);
    let id = rentals[0]["id"].as_i64().unwrap();

    let res = srv
        .client
        .put(srv.url(&format!("/api/rentals/{id}")))
        .bearer_auth(&other)
        .json(&json!({ "price": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .client
        .put(srv.url(&format!("/api/rentals/{id}")))
        .bearer_auth(&owner)
        .json(&json!({ "price": 1100 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Rental updated !");

    let res = srv
        .client
        .get(srv.url(&format!("/api/rentals/{id}")))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    let rental: Value = res.json().await.unwrap();
    assert_eq!(rental["price"], 1100);
    assert_eq!(rental["name"], "Seaside flat");

    for path in ["/api/rentals/404", "/api/rentals/not-a-number"] {
        let res = srv.client.get(srv.url(path)).bearer_auth(&owner).send().await.unwrap();
        assert!(res.status().is_client_error(), "{path}");
    }
}

#[tokio::test]
async fn messages_are_sent_as_the_caller() {
    let srv = TestServer::spawn().await;
    let owner = srv.register("Owner", "owner@example.com", "owner-pw").await;
    let guest = srv.register("Guest", "guest@example.com", "guest-pw").await;
    let guest_id = srv.me(&guest).await["id"].as_i64().unwrap();
    let owner_id = srv.me(&owner).await["id"].as_i64().unwrap();

    let res = srv
        .client
        .post(srv.url("/api/rentals"))
        .bearer_auth(&owner)
        .json(&json!({ "name": "Cabin", "surface": 30, "price": 500, "description": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let send = |token: String, body: Value| {
        let req = srv.client.post(srv.url("/api/messages")).bearer_auth(token).json(&body);
        async move { req.send().await.unwrap() }
    };

    let res = send(guest.clone(), json!({ "message": "Available?", "user_id": guest_id, "rental_id": 1 })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Message send with success");

    let res = send(guest.clone(), json!({ "message": "Spoofed", "user_id": owner_id, "rental_id": 1 })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = send(guest.clone(), json!({ "message": "Hello?", "user_id": guest_id, "rental_id": 77 })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = send(guest.clone(), json!({ "message": "   ", "user_id": guest_id, "rental_id": 1 })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .get(srv.url("/api/rentals/1/messages"))
        .bearer_auth(&guest)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .client
        .get(srv.url("/api/rentals/1/messages"))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let thread: Value = res.json().await.unwrap();
    let messages = thread["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["message"], "Available?");
}
