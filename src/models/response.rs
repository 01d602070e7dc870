//! getUltraSrtNcst XML response structures

use serde::Deserialize;

use super::ObservationItem;

/// Result code the provider uses for a normal answer
pub const NORMAL_SERVICE: &str = "00";

/// Root of a nowcast response
///
/// The same struct also absorbs the gateway's `OpenAPI_ServiceResponse`
/// envelope, which only carries `cmmMsgHeader`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UltraSrtNcstResponse {
    pub header: Option<ResponseHeader>,
    pub body: Option<ResponseBody>,
    #[serde(rename = "cmmMsgHeader")]
    pub gateway_header: Option<GatewayHeader>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeader {
    pub result_code: String,
    #[serde(default)]
    pub result_msg: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub data_type: Option<String>,
    pub items: Option<ResponseItems>,
    pub page_no: Option<u32>,
    pub num_of_rows: Option<u32>,
    pub total_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseItems {
    #[serde(rename = "item", default)]
    pub item: Vec<ObservationItem>,
}

/// Error envelope returned by the data.go.kr gateway (bad key, quota, ...)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayHeader {
    #[serde(default)]
    pub err_msg: String,
    #[serde(default)]
    pub return_auth_msg: String,
    #[serde(default)]
    pub return_reason_code: String,
}

impl UltraSrtNcstResponse {
    /// Wrap already-decoded items in a normal response
    #[must_use]
    pub fn from_items(items: Vec<ObservationItem>) -> Self {
        Self {
            header: Some(ResponseHeader {
                result_code: NORMAL_SERVICE.to_string(),
                result_msg: "NORMAL_SERVICE".to_string(),
            }),
            body: Some(ResponseBody {
                data_type: Some("XML".to_string()),
                total_count: u32::try_from(items.len()).ok(),
                items: Some(ResponseItems { item: items }),
                page_no: Some(1),
                num_of_rows: None,
            }),
            gateway_header: None,
        }
    }

    /// Items of the `body/items` container, if the container is present
    #[must_use]
    pub fn items(&self) -> Option<&[ObservationItem]> {
        self.body
            .as_ref()
            .and_then(|body| body.items.as_ref())
            .map(|items| items.item.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::de::from_str;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<response>
  <header><resultCode>00</resultCode><resultMsg>NORMAL_SERVICE</resultMsg></header>
  <body>
    <dataType>XML</dataType>
    <items>
      <item><baseDate>20250805</baseDate><baseTime>2000</baseTime><category>PTY</category><nx>67</nx><ny>100</ny><obsrValue>0</obsrValue></item>
      <item><baseDate>20250805</baseDate><baseTime>2000</baseTime><category>T1H</category><nx>67</nx><ny>100</ny><obsrValue>26.2</obsrValue></item>
    </items>
    <pageNo>1</pageNo><numOfRows>30</numOfRows><totalCount>2</totalCount>
  </body>
</response>"#;

    #[test]
    fn test_decode_sample_response() {
        let response: UltraSrtNcstResponse = from_str(SAMPLE).unwrap();
        let header = response.header.as_ref().unwrap();
        assert_eq!(header.result_code, "00");

        let items = response.items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].category, "T1H");
        assert_eq!(items[1].obsr_value, "26.2");
        assert_eq!(items[1].nx, 67);
        assert_eq!(response.body.as_ref().unwrap().total_count, Some(2));
    }

    #[test]
    fn test_decode_single_item() {
        let xml = "<response><header><resultCode>00</resultCode></header><body><items>\
                   <item><baseDate>20250805</baseDate><baseTime>2000</baseTime>\
                   <category>REH</category><obsrValue>80</obsrValue></item>\
                   </items></body></response>";
        let response: UltraSrtNcstResponse = from_str(xml).unwrap();
        assert_eq!(response.items().unwrap().len(), 1);
    }

    #[test]
    fn test_decode_gateway_error_envelope() {
        let xml = "<OpenAPI_ServiceResponse><cmmMsgHeader><errMsg>SERVICE ERROR</errMsg>\
                   <returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\
                   <returnReasonCode>30</returnReasonCode></cmmMsgHeader></OpenAPI_ServiceResponse>";
        let response: UltraSrtNcstResponse = from_str(xml).unwrap();
        assert!(response.items().is_none());
        let gateway = response.gateway_header.unwrap();
        assert_eq!(gateway.return_reason_code, "30");
    }
}
