use lambda_http::http::header::{HeaderValue, VARY};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Response};

pub fn with_cors_headers(mut resp: Response<Body>, allowed_origin: &str) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(allowed_origin).unwrap_or_else(|_| HeaderValue::from_static("*")),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PUT,PATCH,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization"),
    );
    if allowed_origin != "*" {
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }

    resp
}

pub fn finalize_response(
    resp: Result<Response<Body>, Error>,
    allowed_origin: &str,
) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(r, allowed_origin))
}

/// Answer a CORS preflight
pub fn preflight(allowed_origin: &str) -> Result<Response<Body>, Error> {
    let resp = Response::builder()
        .status(StatusCode::OK)
        .body(Body::Empty)
        .map_err(Box::new)?;
    Ok(with_cors_headers(resp, allowed_origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_carries_origin_and_methods() {
        let resp = preflight("https://todo.example.com").unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers["Access-Control-Allow-Origin"], "https://todo.example.com");
        assert!(headers["Access-Control-Allow-Methods"]
            .to_str()
            .unwrap()
            .contains("PATCH"));
        assert_eq!(headers[VARY], "Origin");
    }

    #[test]
    fn wildcard_origin_skips_vary() {
        let resp = preflight("*").unwrap();
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
        assert!(resp.headers().get(VARY).is_none());
    }

    #[test]
    fn invalid_origin_falls_back_to_wildcard() {
        let resp = preflight("bad\norigin").unwrap();
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
    }
}
