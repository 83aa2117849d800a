use actix_web::{
  HttpRequest, HttpResponse,
  http::header::{self, HeaderName},
};
use std::sync::OnceLock;

use crate::domain::invoice::Navigator;

pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
pub const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");

/// Per-request [`Navigator`] that turns a recorded redirect into a response.
///
/// htmx requests get `200` with `HX-Redirect` so the client navigates itself.
/// Plain form posts get `303 See Other`.
#[derive(Debug, Default)]
pub struct ResponseNavigator {
  location: OnceLock<String>,
}

impl ResponseNavigator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn into_response(self, req: &HttpRequest) -> HttpResponse {
    match self.location.into_inner() {
      Some(location) if is_htmx(req) => HttpResponse::Ok()
        .insert_header((HX_REDIRECT, location))
        .finish(),
      Some(location) => HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish(),
      None => HttpResponse::Ok().finish(),
    }
  }
}

impl Navigator for ResponseNavigator {
  fn redirect(&self, location: &str) {
    if self.location.set(location.to_string()).is_err() {
      tracing::warn!("Redirect to {} ignored, one is already pending", location);
    }
  }
}

pub fn is_htmx(req: &HttpRequest) -> bool {
  req
    .headers()
    .get(HX_REQUEST)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{http::StatusCode, test::TestRequest};

  #[test]
  fn test_htmx_request_gets_hx_redirect() {
    let req = TestRequest::post()
      .insert_header(("HX-Request", "true"))
      .to_http_request();

    let navigator = ResponseNavigator::new();
    navigator.redirect("/dashboard/invoices");
    let resp = navigator.into_response(&req);

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(HX_REDIRECT).unwrap(),
      "/dashboard/invoices"
    );
    assert!(resp.headers().get(header::LOCATION).is_none());
  }

  #[test]
  fn test_plain_post_gets_see_other() {
    let req = TestRequest::post().to_http_request();

    let navigator = ResponseNavigator::new();
    navigator.redirect("/dashboard/invoices");
    let resp = navigator.into_response(&req);

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
      resp.headers().get(header::LOCATION).unwrap(),
      "/dashboard/invoices"
    );
  }

  #[test]
  fn test_first_redirect_wins() {
    let navigator = ResponseNavigator::new();
    navigator.redirect("/a");
    navigator.redirect("/b");

    let resp = navigator.into_response(&TestRequest::post().to_http_request());
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/a");
  }

  #[test]
  fn test_no_redirect_is_plain_ok() {
    let req = TestRequest::delete().to_http_request();
    let resp = ResponseNavigator::new().into_response(&req);
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(HX_REDIRECT).is_none());
    assert!(resp.headers().get(header::LOCATION).is_none());
  }
}
