use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use storage::Database;
use tower::ServiceExt;
use web::{AppState, app, middleware::auth::TokenKeys};

struct TestApp {
    router: Router,
}

struct Account {
    token: String,
    user_id: String,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.run_migrations().await.unwrap();

        let state = AppState {
            db,
            tokens: TokenKeys::new("integration-test-secret", 1),
        };

        Self { router: app(state) }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    async fn signup(&self, email: &str, role: &str) -> Account {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/signup",
                None,
                Some(json!({
                    "email": email,
                    "password": "s3cret-pass",
                    "role": role,
                    "companyName": "Acme"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);

        Account {
            token: body["token"].as_str().unwrap().to_string(),
            user_id: body["userId"].as_str().unwrap().to_string(),
        }
    }

    async fn create_event(&self, admin: &Account, name: &str, limit: i64) -> String {
        let (status, body) = self
            .post(
                "/api/events",
                &admin.token,
                json!({
                    "name": name,
                    "category": "Outdoor",
                    "startDate": "2024-09-14",
                    "endDate": "2024-09-15",
                    "location": "North field",
                    "participantLimit": limit
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["eventId"].as_str().unwrap().to_string()
    }

    async fn create_team(&self, leader: &Account, event_id: &str, code: Option<&str>) -> Value {
        let mut payload = json!({
            "teamLeaderId": leader.user_id,
            "eventId": event_id,
        });
        if let Some(code) = code {
            payload["teamCode"] = json!(code);
        }

        let (status, body) = self.post("/api/teams", &leader.token, payload).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }
}

fn member_ids(team: &Value) -> Vec<String> {
    team["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["userId"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn signup_and_login() {
    let app = TestApp::new().await;
    let account = app.signup("Ada@Example.com", "employee").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({"email": "ada@example.com", "password": "another-pass", "role": "judge"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "ada@example.com", "password": "s3cret-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], account.user_id.as_str());
    assert_eq!(body["role"], "employee");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "ada@example.com", "password": "wrong-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "s3cret-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn only_the_first_admin_can_sign_up() {
    let app = TestApp::new().await;
    let admin = app.signup("admin@example.com", "admin").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({
                "email": "mallory@example.com",
                "password": "s3cret-pass",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin accounts cannot be self-registered");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "mallory@example.com", "password": "s3cret-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "admin@example.com", "password": "s3cret-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], admin.user_id.as_str());
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn signup_validation() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({"email": "not-an-email", "password": "abc", "role": "employee"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn user_profile_hides_password() {
    let app = TestApp::new().await;
    let account = app.signup("bea@example.com", "judge").await;

    let (status, body) = app.get(&format!("/api/users/{}", account.user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "bea@example.com");
    assert_eq!(body["points"], 0);
    assert_eq!(body["companyName"], "Acme");
    assert!(body.get("passwordHash").is_none());

    let (status, body) = app
        .get("/api/users/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn event_management_is_admin_only() {
    let app = TestApp::new().await;
    let admin = app.signup("admin@example.com", "admin").await;
    let employee = app.signup("emp@example.com", "employee").await;

    let payload = json!({
        "name": "Annual 5K Run",
        "category": "Fun Sports",
        "startDate": "2024-10-01",
        "endDate": "2024-10-01",
        "location": "Riverside",
        "participantLimit": 50
    });

    let (status, _) = app
        .request(Method::POST, "/api/events", None, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/api/events", "not-a-token", payload.clone())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post("/api/events", &employee.token, payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app.post("/api/events", &admin.token, payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["category"], "Fun Sports");
    let event_uri = format!("/api/events/{}", created["eventId"].as_str().unwrap());

    let (status, updated) = app
        .request(
            Method::PUT,
            &event_uri,
            Some(&admin.token),
            Some(json!({"location": "City park", "participantLimit": 60})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["location"], "City park");
    assert_eq!(updated["name"], "Annual 5K Run");

    let (status, _) = app
        .request(
            Method::PUT,
            &event_uri,
            Some(&admin.token),
            Some(json!({"endDate": "2024-09-01"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, list) = app.get("/api/events").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = app
        .request(Method::DELETE, &event_uri, Some(&employee.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::DELETE, &event_uri, Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&event_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_dates_must_be_ordered() {
    let app = TestApp::new().await;
    let admin = app.signup("admin@example.com", "admin").await;

    let (status, body) = app
        .post(
            "/api/events",
            &admin.token,
            json!({
                "name": "Carrom",
                "category": "Indoor",
                "startDate": "2024-10-02",
                "endDate": "2024-10-01",
                "location": "Lounge",
                "participantLimit": 8
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
}

#[tokio::test]
async fn event_limit_cannot_drop_below_registered_teams() {
    let app = TestApp::new().await;
    let admin = app.signup("admin@example.com", "admin").await;
    let event_id = app.create_event(&admin, "Relay", 3).await;
    for i in 0..3 {
        let leader = app.signup(&format!("lead{}@example.com", i), "employee").await;
        app.create_team(&leader, &event_id, None).await;
    }
    let event_uri = format!("/api/events/{}", event_id);

    let (status, body) = app
        .request(
            Method::PUT,
            &event_uri,
            Some(&admin.token),
            Some(json!({"participantLimit": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Event has more teams than the new limit");

    let (_, event) = app.get(&event_uri).await;
    assert_eq!(event["participantLimit"], 3);

    let (status, event) = app
        .request(
            Method::PUT,
            &event_uri,
            Some(&admin.token),
            Some(json!({"participantLimit": 4})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["participantLimit"], 4);
}

#[tokio::test]
async fn team_registration_and_join() {
    let app = TestApp::new().await;
    let admin = app.signup("admin@example.com", "admin").await;
    let leader = app.signup("u1@example.com", "employee").await;
    let joiner = app.signup("u2@example.com", "employee").await;
    let event_id = app.create_event(&admin, "Volleyball", 4).await;

    let team = app.create_team(&leader, &event_id, Some("AB12CD")).await;
    assert_eq!(team["teamCode"], "AB12CD");
    assert_eq!(member_ids(&team), vec![leader.user_id.clone()]);
    assert_eq!(team["events"], json!([event_id]));
    assert_eq!(team["score"], 0);
    assert_eq!(team["teamLeader"]["email"], "u1@example.com");

    let (status, by_code) = app.get("/api/teams/code/AB12CD").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_code["teamId"], team["teamId"]);

    let (status, body) = app
        .post(
            "/api/teams",
            &leader.token,
            json!({"teamCode": "AB12CD", "teamLeaderId": leader.user_id, "eventId": event_id}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    // cannot join on someone else's behalf
    let (status, _) = app
        .post(
            "/api/teams/join",
            &joiner.token,
            json!({"teamCode": "AB12CD", "userId": leader.user_id}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, joined) = app
        .post(
            "/api/teams/join",
            &joiner.token,
            json!({"teamCode": "ab12cd", "userId": joiner.user_id}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        member_ids(&joined),
        vec![leader.user_id.clone(), joiner.user_id.clone()]
    );

    let (status, body) = app
        .post(
            "/api/teams/join",
            &joiner.token,
            json!({"teamCode": "AB12CD", "userId": joiner.user_id}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already in team");

    let (status, _) = app
        .post(
            "/api/teams/join",
            &joiner.token,
            json!({"teamCode": "ZZZZ99", "userId": joiner.user_id}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let team_uri = format!("/api/teams/{}", team["teamId"].as_str().unwrap());
    let (status, fetched) = app.get(&team_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["members"].as_array().unwrap().len(), 2);

    let (_, by_event) = app.get(&format!("/api/teams/event/{}", event_id)).await;
    assert_eq!(by_event.as_array().unwrap().len(), 1);

    let (_, by_user) = app
        .get(&format!("/api/teams/user/{}", joiner.user_id))
        .await;
    assert_eq!(by_user.as_array().unwrap().len(), 1);

    let (_, all) = app.get("/api/teams").await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn team_creation_rules() {
    let app = TestApp::new().await;
    let admin = app.signup("admin@example.com", "admin").await;
    let leader = app.signup("u1@example.com", "employee").await;
    let other = app.signup("u2@example.com", "employee").await;
    let event_id = app.create_event(&admin, "Chess", 1).await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/teams",
            None,
            Some(json!({"teamLeaderId": leader.user_id, "eventId": event_id})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/teams",
            &other.token,
            json!({"teamLeaderId": leader.user_id, "eventId": event_id}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/api/teams",
            &leader.token,
            json!({"teamCode": "A!", "teamLeaderId": leader.user_id, "eventId": event_id}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let generated = app.create_team(&leader, &event_id, None).await;
    assert_eq!(generated["teamCode"].as_str().unwrap().len(), 6);

    // participant limit of one team
    let (status, body) = app
        .post(
            "/api/teams",
            &other.token,
            json!({"teamLeaderId": other.user_id, "eventId": event_id}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Event is full");
}

#[tokio::test]
async fn leader_registers_team_for_more_events() {
    let app = TestApp::new().await;
    let admin = app.signup("admin@example.com", "admin").await;
    let leader = app.signup("u1@example.com", "employee").await;
    let member = app.signup("u2@example.com", "employee").await;
    let first = app.create_event(&admin, "Volleyball", 4).await;
    let second = app.create_event(&admin, "Football", 4).await;

    let team = app.create_team(&leader, &first, Some("KICK01")).await;
    let uri = format!("/api/teams/{}/events", team["teamId"].as_str().unwrap());

    app.post(
        "/api/teams/join",
        &member.token,
        json!({"teamCode": "KICK01", "userId": member.user_id}),
    )
    .await;

    let (status, _) = app
        .post(&uri, &member.token, json!({"eventId": second}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(&uri, &leader.token, json!({"eventId": second}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"], json!([first, second]));

    let (status, _) = app
        .post(&uri, &leader.token, json!({"eventId": second}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn judging_awards_points_to_teams_and_members() {
    let app = TestApp::new().await;
    let admin = app.signup("admin@example.com", "admin").await;
    let judge = app.signup("judge@example.com", "judge").await;
    let event_id = app.create_event(&admin, "Football", 8).await;

    let mut teams = Vec::new();
    let mut players = Vec::new();
    for i in 0..4 {
        let leader = app.signup(&format!("lead{}@example.com", i), "employee").await;
        let mate = app.signup(&format!("mate{}@example.com", i), "employee").await;
        let team = app.create_team(&leader, &event_id, None).await;
        let code = team["teamCode"].as_str().unwrap().to_string();
        let (status, _) = app
            .post(
                "/api/teams/join",
                &mate.token,
                json!({"teamCode": code, "userId": mate.user_id}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        teams.push(team["teamId"].as_str().unwrap().to_string());
        players.push((leader, mate));
    }

    let uri = format!("/api/scoring/events/{}", event_id);
    let podium = json!({"first": teams[0], "second": teams[1], "third": teams[2]});

    let (status, _) = app.post(&uri, &players[0].0.token, podium.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            &uri,
            &judge.token,
            json!({"first": teams[0], "second": teams[0], "third": teams[2]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.post(&uri, &judge.token, podium.clone()).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let awards = body["awards"].as_array().unwrap();
    assert_eq!(awards.len(), 3);
    assert_eq!(awards[0]["place"], "first");
    assert_eq!(awards[0]["points"], 5);
    assert_eq!(awards[0]["membersAwarded"], 2);

    for ((leader, mate), expected) in players.iter().zip([5, 3, 1, 0]) {
        for player in [leader, mate] {
            let (_, user) = app.get(&format!("/api/users/{}", player.user_id)).await;
            assert_eq!(user["points"], expected);
        }
    }

    let (_, team) = app.get(&format!("/api/teams/{}", teams[0])).await;
    assert_eq!(team["score"], 5);

    let (status, _) = app.post(&uri, &judge.token, podium).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, team) = app.get(&format!("/api/teams/{}", teams[0])).await;
    assert_eq!(team["score"], 5);

    let (status, standings) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(standings["judged"], true);
    assert_eq!(standings["teams"][0]["teamId"], teams[0].as_str());
    assert_eq!(standings["teams"][3]["score"], 0);
}

#[tokio::test]
async fn leaderboard_ranks_non_admins() {
    let app = TestApp::new().await;
    let admin = app.signup("admin@example.com", "admin").await;
    let judge = app.signup("judge@example.com", "judge").await;

    let mut accounts = Vec::new();
    for i in 0..11 {
        accounts.push(app.signup(&format!("p{:02}@example.com", i), "employee").await);
    }

    for (i, account) in accounts.iter().enumerate() {
        let (status, _) = app
            .request(
                Method::PUT,
                "/api/users/points",
                Some(&judge.token),
                Some(json!({"userId": account.user_id, "points": (i as i64 % 4) + 1})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/users/points",
            Some(&admin.token),
            Some(json!({"userId": admin.user_id, "points": 1000})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/users/points",
            Some(&accounts[0].token),
            Some(json!({"userId": accounts[0].user_id, "points": 10})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/users/points",
            Some(&judge.token),
            Some(json!({"userId": accounts[0].user_id, "points": 0})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, board) = app.get("/api/users/board").await;
    assert_eq!(status, StatusCode::OK);

    let board = board.as_array().unwrap();
    assert_eq!(board.len(), 10);
    assert!(board.iter().all(|entry| entry["role"] != "admin"));
    let points: Vec<i64> = board.iter().map(|e| e["points"].as_i64().unwrap()).collect();
    assert!(points.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(points[0], 4);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, doc) = app.get("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/teams/join"].is_object());
    assert!(doc["paths"]["/api/scoring/events/{event_id}"].is_object());
}
