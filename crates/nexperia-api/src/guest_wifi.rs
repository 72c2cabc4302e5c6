// Guest Wi-Fi switch
//
// Read: visit the guest Wi-Fi page through the page loader (the data
// endpoint answers with an empty body otherwise), keep the write token it
// embeds, then fetch the on/off XML fragment. Both requests carry a
// millisecond timestamp to defeat caching.
//
// Write: always preceded by a fresh read in the same call; the POST is
// skipped when the switch is already in the requested state.

use std::collections::BTreeMap;

use chrono::Utc;
use roxmltree::{Document, Node};
use serde::Serialize;
use tracing::{debug, info, trace};
use url::Url;

use crate::client::{
    GUEST_WIFI_DATA_PATH, GUEST_WIFI_PAGE, GUEST_WIFI_PAGE_ID, PAGE_LOADER_PATH, RouterClient,
    RouterEndpoint,
};
use crate::error::Error;
use crate::token::extract_write_token;

/// XML element wrapping the guest Wi-Fi switch parameters.
pub const GUEST_WIFI_SWITCH: &str = "OBJ_GUESTWIFISWITCH_ID";

/// Parameter holding the on/off state (`1` = on).
pub const ENABLE_PARAM: &str = "Enable";

/// Keeps the data request's cache-buster distinct from the page request's.
const DATA_TIMESTAMP_OFFSET_MS: i64 = 83;

/// Parameters of the guest Wi-Fi switch object, keyed by `ParaName`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GuestWifiSettings(BTreeMap<String, i64>);

impl GuestWifiSettings {
    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` iff `Enable == 1`.
    pub fn enabled(&self) -> Result<bool, Error> {
        self.get(ENABLE_PARAM)
            .map(|v| v == 1)
            .ok_or_else(|| Error::MissingParameter {
                name: ENABLE_PARAM.into(),
            })
    }
}

impl FromIterator<(String, i64)> for GuestWifiSettings {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Whether a call to [`RouterClient::set_guest_wifi_enable`] sent a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The switch already had the requested state; nothing was posted.
    Unchanged,
    /// The apply form was posted. The router's answer is not checked.
    Applied,
}

/// Parse the on/off fragment into its name → value mapping.
///
/// `Instance/ParaName` and `Instance/ParaValue` elements are paired by
/// position in document order.
pub fn parse_guest_wifi_settings(xml: &str) -> Result<GuestWifiSettings, Error> {
    let doc = Document::parse(xml).map_err(|e| Error::MalformedXml {
        message: e.to_string(),
        body: xml.to_owned(),
    })?;

    let switch = doc
        .descendants()
        .find(|n| n.has_tag_name(GUEST_WIFI_SWITCH))
        .ok_or(Error::GuestWifiElementNotFound)?;

    let names: Vec<Node<'_, '_>> = instance_children(switch, "ParaName").collect();
    let values: Vec<Node<'_, '_>> = instance_children(switch, "ParaValue").collect();
    if names.len() != values.len() {
        return Err(Error::ParameterMismatch {
            names: names.len(),
            values: values.len(),
        });
    }

    names
        .into_iter()
        .zip(values)
        .map(|(name, value)| {
            let name = name.text().unwrap_or_default().trim().to_owned();
            let raw = value.text().unwrap_or_default();
            let parsed = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::InvalidParameterValue {
                    name: name.clone(),
                    value: raw.to_owned(),
                })?;
            Ok::<_, Error>((name, parsed))
        })
        .collect()
}

fn instance_children<'a, 'input: 'a>(
    switch: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    switch
        .children()
        .filter(|n| n.has_tag_name("Instance"))
        .flat_map(move |instance| instance.children().filter(move |n| n.has_tag_name(tag)))
}

fn guest_wifi_page_url(endpoint: &RouterEndpoint, timestamp_ms: i64) -> Result<Url, Error> {
    let mut url = endpoint.join(PAGE_LOADER_PATH)?;
    url.query_pairs_mut()
        .append_pair("pid", GUEST_WIFI_PAGE_ID)
        .append_pair("nextpage", GUEST_WIFI_PAGE)
        .append_pair("Menu3Location", "0")
        .append_pair("_", &timestamp_ms.to_string());
    Ok(url)
}

fn guest_wifi_data_url(endpoint: &RouterEndpoint, timestamp_ms: i64) -> Result<Url, Error> {
    let mut url = endpoint.join(GUEST_WIFI_DATA_PATH)?;
    url.query_pairs_mut()
        .append_pair("_", &timestamp_ms.to_string());
    Ok(url)
}

impl RouterClient {
    /// Current guest Wi-Fi state. Logs in first if needed.
    pub async fn get_guest_wifi_enabled(&mut self) -> Result<bool, Error> {
        self.guest_wifi_settings().await?.enabled()
    }

    /// Full parameter mapping of the guest Wi-Fi switch. Logs in first if
    /// needed, and refreshes the write token as a side effect.
    pub async fn guest_wifi_settings(&mut self) -> Result<GuestWifiSettings, Error> {
        let endpoint = self.endpoint().clone();
        let page_url = guest_wifi_page_url(&endpoint, Utc::now().timestamp_millis())?;

        let session = self.session_mut().await?;
        session.write_token = None;

        let page = session.get_text(page_url).await?;
        let token = extract_write_token(&page)?;
        trace!(token_len = token.as_str().chars().count(), "write token scraped");
        session.write_token = Some(token);

        let data_url = guest_wifi_data_url(
            &endpoint,
            Utc::now().timestamp_millis() + DATA_TIMESTAMP_OFFSET_MS,
        )?;
        let body = session.get_text(data_url).await?;
        let settings = parse_guest_wifi_settings(&body)?;

        debug!(params = settings.len(), "guest Wi-Fi settings read");
        Ok(settings)
    }

    /// Switch guest Wi-Fi on or off.
    ///
    /// Reads the current state first; when it already matches, no write is
    /// sent. The write carries the token scraped by that same read.
    pub async fn set_guest_wifi_enable(&mut self, enable: bool) -> Result<WriteOutcome, Error> {
        let current = self.get_guest_wifi_enabled().await?;
        if current == enable {
            debug!(enabled = enable, "guest Wi-Fi already in requested state");
            return Ok(WriteOutcome::Unchanged);
        }

        let url = self.endpoint().join(GUEST_WIFI_DATA_PATH)?;
        let session = self.session.as_mut().ok_or(Error::NotLoggedIn)?;
        let token = session
            .write_token
            .take()
            .ok_or(Error::WriteTokenNotFound)?;

        session
            .post_form(
                url,
                &[
                    ("IF_ACTION", "Apply"),
                    ("_InstID", ""),
                    ("Enable", if enable { "1" } else { "0" }),
                    ("Btn_cancel_GuestWiFiOnOff", ""),
                    ("Btn_apply_GuestWiFiOnOff", ""),
                    ("_sessionTOKEN", token.as_str()),
                ],
            )
            .await?;

        info!(enabled = enable, "guest Wi-Fi change applied");
        Ok(WriteOutcome::Applied)
    }
}
