fn main() {
    let mut server = mockito::Server::new();
    let _m = server.mock("POST", "/auth/v1/token").with_status(400).create();
    let url = server.url();
    let client = reqwest::blocking::Client::new();
    let resp = client.post(format!("{}/auth/v1/token", url))
        .query(&[("grant_type","password")])
        .json(&serde_json::json!({"email":"a","password":"b"}))
        .send().unwrap();
    println!("status = {}", resp.status());
}
