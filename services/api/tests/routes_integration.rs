use api::{build_state, config::AppConfig, routes::create_router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let state = build_state(AppConfig::in_memory()).await.unwrap();
    create_router(state)
}

struct TestResponse {
    status: StatusCode,
    cookie: Option<String>,
    version: Option<String>,
    body: Value,
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let version = response
        .headers()
        .get("x-api-version")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        cookie,
        version,
        body,
    }
}

async fn register(app: &Router, username: &str, role: &str) -> (Value, String) {
    let response = call(
        app,
        Method::POST,
        "/api/register",
        Some(json!({
            "username": username,
            "password": "password123",
            "email": format!("{}@example.com", username),
            "fullName": format!("{} Smith", username),
            "role": role,
            "bio": "Ten years behind the chair",
            "location": "Austin, TX",
            "city": "Austin",
            "state": "TX"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    (response.body, response.cookie.unwrap())
}

fn registration_body(username: &str) -> Value {
    json!({
        "username": username,
        "password": "password123",
        "email": format!("{}@example.com", username),
        "fullName": format!("{} Smith", username),
        "role": "client"
    })
}

async fn create_service(app: &Router, stylist_id: &str) -> Value {
    let response = call(
        app,
        Method::POST,
        "/api/services",
        Some(json!({
            "hairstylistId": stylist_id,
            "categoryId": "cuts",
            "name": "Signature Cut",
            "description": "Wash, cut and style",
            "basePrice": "45.00",
            "duration": 60
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body
}

#[tokio::test]
async fn test_health_and_version_header() {
    let app = app().await;
    let response = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.version.as_deref(), Some("1"));

    let response = call(&app, Method::GET, "/api/bookings/missing", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.version.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = app().await;

    let response = call(&app, Method::GET, "/api/user", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let (user, cookie) = register(&app, "jane", "client").await;
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let response = call(&app, Method::GET, "/api/user", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "jane");

    let response = call(&app, Method::POST, "/api/logout", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = call(&app, Method::GET, "/api/user", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = call(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({ "username": "jane", "password": "wrong-password" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Invalid credentials");

    let response = call(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({ "username": "jane", "password": "password123" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.cookie.unwrap();
    let response = call(&app, Method::GET, "/api/user", None, Some(&cookie)).await;
    assert_eq!(response.body["id"], user["id"]);
}

#[tokio::test]
async fn test_registration_rules() {
    let app = app().await;
    register(&app, "taken", "client").await;

    let response = call(
        &app,
        Method::POST,
        "/api/register",
        Some(json!({
            "username": "taken",
            "password": "password123",
            "email": "other@example.com",
            "fullName": "Someone Else"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Username already exists");

    let response = call(
        &app,
        Method::POST,
        "/api/register",
        Some(json!({
            "username": "newbarber",
            "password": "password123",
            "email": "barber@example.com",
            "fullName": "New Barber",
            "role": "barber"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Validation failed");
    let paths: Vec<&str> = response.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["path"][0].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["bio", "location"]);
}

#[tokio::test]
async fn test_profile_changes_are_owner_only() {
    let app = app().await;
    let (jane, jane_cookie) = register(&app, "jane", "client").await;
    let (_, mark_cookie) = register(&app, "mark", "client").await;
    let uri = format!("/api/users/{}", jane["id"].as_str().unwrap());

    let response = call(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "city": "Dallas" })),
        Some(&mark_cookie),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = call(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "city": "Dallas" })),
        Some(&jane_cookie),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["city"], "Dallas");
    assert_eq!(response.body["fullName"], "jane Smith");

    let response = call(&app, Method::DELETE, &uri, None, Some(&jane_cookie)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = call(&app, Method::GET, &uri, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_priced_from_service() {
    let app = app().await;
    let (client, _) = register(&app, "client1", "client").await;
    let (stylist, _) = register(&app, "stylist1", "hairstylist").await;
    let service = create_service(&app, stylist["id"].as_str().unwrap()).await;

    let response = call(
        &app,
        Method::POST,
        "/api/bookings",
        Some(json!({
            "clientId": client["id"],
            "hairstylistId": stylist["id"],
            "serviceId": service["id"],
            "appointmentDate": "2024-06-01T15:00:00Z"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["status"], "pending");
    assert_eq!(response.body["totalPrice"], service["basePrice"]);
    assert_eq!(response.body["duration"], 60);

    let response = call(
        &app,
        Method::POST,
        "/api/bookings",
        Some(json!({
            "clientId": client["id"],
            "hairstylistId": stylist["id"],
            "serviceId": "no-such-service",
            "appointmentDate": "2024-06-01T15:00:00Z"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"][0]["path"][0], "serviceId");
}

#[tokio::test]
async fn test_booking_status_patch_changes_only_status() {
    let app = app().await;
    let (client, _) = register(&app, "client1", "client").await;
    let (stylist, _) = register(&app, "stylist1", "hairstylist").await;
    let service = create_service(&app, stylist["id"].as_str().unwrap()).await;

    let created = call(
        &app,
        Method::POST,
        "/api/bookings",
        Some(json!({
            "clientId": client["id"],
            "hairstylistId": stylist["id"],
            "serviceId": service["id"],
            "appointmentDate": "2024-06-01T15:00:00Z",
            "notes": "First visit"
        })),
        None,
    )
    .await
    .body;

    let uri = format!("/api/bookings/{}/status", created["id"].as_str().unwrap());
    let response = call(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "status": "confirmed" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let mut updated = response.body;
    assert_eq!(updated["status"], "confirmed");
    let mut before = created.clone();
    for body in [&mut before, &mut updated] {
        let fields = body.as_object_mut().unwrap();
        fields.remove("status");
        fields.remove("updatedAt");
    }
    assert_eq!(before, updated);

    let response = call(&app, Method::PATCH, &uri, Some(json!({ "status": " " })), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"][0]["path"][0], "status");

    let response = call(
        &app,
        Method::PATCH,
        "/api/bookings/missing/status",
        Some(json!({ "status": "confirmed" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_open_jobs_listing() {
    let app = app().await;
    let job = json!({
        "title": "Bridal updo",
        "description": "Updo for a June wedding",
        "category": "styling",
        "city": "Austin",
        "state": "TX",
        "budgetMin": "80",
        "budgetMax": "150"
    });

    let response = call(&app, Method::POST, "/api/jobs", Some(job.clone()), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let (poster, cookie) = register(&app, "bride", "client").await;
    let response = call(&app, Method::POST, "/api/jobs", Some(job), Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["status"], "open");
    assert_eq!(response.body["posterId"], poster["id"]);
    assert_eq!(response.body["poster"]["username"], "bride");
    let job_id = response.body["id"].as_str().unwrap().to_string();

    let response = call(&app, Method::GET, "/api/jobs?status=open", None, None).await;
    let jobs = response.body.as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert!(jobs.iter().all(|j| j["status"] == "open"));
    assert_eq!(jobs[0]["poster"]["fullName"], "bride Smith");

    let response = call(
        &app,
        Method::PATCH,
        &format!("/api/jobs/{}/status", job_id),
        Some(json!({ "status": "closed" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = call(&app, Method::GET, "/api/jobs?status=open", None, None).await;
    assert!(response.body.as_array().unwrap().is_empty());
    let response = call(&app, Method::GET, "/api/jobs?status=closed", None, None).await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_messages_and_conversations() {
    let app = app().await;
    let (alice, alice_cookie) = register(&app, "alice", "client").await;
    let (bob, bob_cookie) = register(&app, "bob", "hairstylist").await;
    let alice_id = alice["id"].as_str().unwrap();
    let bob_id = bob["id"].as_str().unwrap();

    let response = call(
        &app,
        Method::POST,
        "/api/messages",
        Some(json!({ "recipientId": bob_id, "content": "Hi, are you free Friday?" })),
        Some(&alice_cookie),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["senderId"], alice_id);
    assert_eq!(response.body["messageType"], "text");
    assert_eq!(response.body["isRead"], false);
    let first_id = response.body["id"].as_str().unwrap().to_string();

    let response = call(
        &app,
        Method::POST,
        "/api/messages",
        Some(json!({ "receiverId": alice_id, "content": "Yes, 3pm works" })),
        Some(&bob_cookie),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = call(
        &app,
        Method::POST,
        "/api/messages",
        Some(json!({ "recipientId": alice_id, "content": "anonymous" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let uri = format!("/api/conversations/{}/{}", alice_id, bob_id);
    let response = call(&app, Method::GET, &uri, None, None).await;
    let contents: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["Hi, are you free Friday?", "Yes, 3pm works"]);

    let response = call(&app, Method::GET, "/api/conversations", None, Some(&bob_cookie)).await;
    let inbox = response.body.as_array().unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["id"], alice_id);
    assert_eq!(inbox[0]["unreadCount"], 1);
    assert_eq!(inbox[0]["lastMessage"]["content"], "Yes, 3pm works");
    assert_eq!(inbox[0]["participants"].as_array().unwrap().len(), 2);

    // Marking read twice is fine
    for _ in 0..2 {
        let response = call(
            &app,
            Method::PATCH,
            &format!("/api/messages/{}/read", first_id),
            None,
            None,
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["isRead"], true);
    }

    let response = call(
        &app,
        Method::PATCH,
        &format!("/api/conversations/{}/{}/read", alice_id, bob_id),
        None,
        None,
    )
    .await;
    assert_eq!(response.body["updated"], 1);

    let response = call(
        &app,
        Method::GET,
        &format!("/api/conversations?userId={}", alice_id),
        None,
        None,
    )
    .await;
    assert_eq!(response.body[0]["unreadCount"], 0);

    let response = call(&app, Method::PATCH, "/api/messages/missing/read", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_missing_ids_is_not_found() {
    let app = app().await;
    for uri in [
        "/api/bookings/nope",
        "/api/services/nope",
        "/api/service-categories/nope",
        "/api/portfolio/nope",
        "/api/messages/nope",
        "/api/message-templates/nope",
        "/api/hair-history/nope",
        "/api/jobs/nope",
    ] {
        let response = call(&app, Method::DELETE, uri, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(response.body["error"].as_str().unwrap().ends_with("not found"));
    }
}

#[tokio::test]
async fn test_seeded_catalog_and_templates() {
    let app = app().await;
    let response = call(&app, Method::GET, "/api/service-categories", None, None).await;
    let names: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cuts", "Colors", "Treatments", "Styling"]);

    let response = call(
        &app,
        Method::POST,
        "/api/message-templates",
        Some(json!({
            "hairstylistId": "stylist-1",
            "name": "Running late",
            "content": "Running 10 minutes late, sorry!",
            "category": "reminder"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["isDefault"], false);

    let response = call(
        &app,
        Method::GET,
        "/api/message-templates?hairstylistId=stylist-1",
        None,
        None,
    )
    .await;
    assert_eq!(response.body.as_array().unwrap().len(), 5);

    let response = call(
        &app,
        Method::GET,
        "/api/message-templates?hairstylistId=stylist-2",
        None,
        None,
    )
    .await;
    assert_eq!(response.body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_provider_search() {
    let app = app().await;
    register(&app, "someclient", "client").await;
    let (stylist, _) = register(&app, "stylist1", "hairstylist").await;
    register(&app, "barber1", "barber").await;
    let stylist_id = stylist["id"].as_str().unwrap();
    create_service(&app, stylist_id).await;

    for n in 0..4 {
        let response = call(
            &app,
            Method::POST,
            "/api/portfolio",
            Some(json!({
                "hairstylistId": stylist_id,
                "title": format!("Look {}", n),
                "afterImage": format!("https://img.example.com/{}.jpg", n),
                "tags": ["balayage"]
            })),
            None,
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = call(&app, Method::GET, "/api/service-providers", None, None).await;
    assert_eq!(response.body.as_array().unwrap().len(), 2);

    let response = call(
        &app,
        Method::GET,
        "/api/service-providers?role=hairstylist&city=austin",
        None,
        None,
    )
    .await;
    let providers = response.body.as_array().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0]["username"], "stylist1");
    assert_eq!(providers[0]["services"].as_array().unwrap().len(), 1);
    assert_eq!(providers[0]["portfolioPreview"].as_array().unwrap().len(), 3);

    let response = call(
        &app,
        Method::GET,
        "/api/service-providers?role=wizard",
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"][0]["path"][0], "role");

    let response = call(&app, Method::GET, "/api/hairstylists", None, None).await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_keeps_usernames_unique() {
    let app = app().await;

    let attempts: Vec<_> = (0..4)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                call(
                    &app,
                    Method::POST,
                    "/api/register",
                    Some(registration_body("dupe")),
                    None,
                )
                .await
            })
        })
        .collect();

    let mut created = 0;
    for attempt in attempts {
        let response = attempt.await.unwrap();
        if response.status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.body["error"], "Username already exists");
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn test_session_user_is_the_sender() {
    let app = app().await;
    let (alice, alice_cookie) = register(&app, "alice", "client").await;
    let (bob, _) = register(&app, "bob", "barber").await;
    let alice_id = alice["id"].as_str().unwrap();
    let bob_id = bob["id"].as_str().unwrap();

    let response = call(
        &app,
        Method::POST,
        "/api/messages",
        Some(json!({ "senderId": bob_id, "recipientId": bob_id, "content": "Posing as bob" })),
        Some(&alice_cookie),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["senderId"], alice_id);

    let response = call(
        &app,
        Method::POST,
        "/api/messages",
        Some(json!({ "senderId": bob_id, "recipientId": alice_id, "content": "From a script" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["senderId"], bob_id);
}
