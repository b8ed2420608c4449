//! Static HTML pages: landing and API help.

use axum::response::Html;
use tns_mirror_core::MAX_RADIUS_ARCSEC;

pub async fn index() -> Html<String> {
    Html(
        r#"
            <p>
                Welcome to <a href="//snad.space">SNAD</a>
                <a href="http://www.wis-tns.org">TNS</a>
                mirror
            </p>
            <p>
                See API details on <a href="/api/v1/help">/api/v1/help</a>
            </p>
        "#
        .to_owned(),
    )
}

pub async fn help() -> Html<String> {
    Html(format!(
        r#"
            <h1>Available resources</h1>
            <h2><font face='monospace'>/api/v1/all</font></h2>
                <p> Get all objects</p>
            <h2><font face='monospace'>/api/v1/circle</font></h2>
                <p> Get objects in the circle</p>
                <p> Query parameters:</p>
                <ul>
                    <li><font face='monospace'>ra</font> &mdash; right ascension of the circle center, degrees. Mandatory</li>
                    <li><font face='monospace'>dec</font> &mdash; declination of the circle center, degrees. Mandatory</li>
                    <li><font face='monospace'>radius_arcsec</font> &mdash; circle radius, arcseconds. Mandatory, should be positive and at most {MAX_RADIUS_ARCSEC}</li>
                </ul>
            <h2><font face='monospace'>/api/v1/object</font></h2>
                <p> Get object by name</p>
                <p> Query parameters:</p>
                <ul>
                    <li><font face='monospace'>name</font> &mdash; name of the event, like "2018lwh". Mandatory</li>
                </ul>
        "#,
    ))
}
