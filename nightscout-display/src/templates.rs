//! APL documents. Both are fixed; all data arrives through `payload`.

use serde_json::{json, Value};

pub const APL_VERSION: &str = "2024.2";

/// Summary header plus one repeating region bound to `payload.rows`.
pub fn rows_document() -> Value {
    json!({
        "type": "APL",
        "version": APL_VERSION,
        "theme": "dark",
        "mainTemplate": {
            "parameters": ["payload"],
            "items": [
                {
                    "type": "Container",
                    "width": "100vw",
                    "height": "100vh",
                    "paddingLeft": "32dp",
                    "paddingRight": "32dp",
                    "paddingTop": "24dp",
                    "items": [
                        {
                            "type": "Text",
                            "text": "${payload.title}",
                            "fontSize": "28dp",
                            "color": "#9AA5B1"
                        },
                        {
                            "type": "Container",
                            "direction": "row",
                            "alignItems": "center",
                            "items": [
                                {
                                    "type": "Text",
                                    "text": "${payload.latestValue}",
                                    "fontSize": "72dp",
                                    "fontWeight": "bold"
                                },
                                {
                                    "type": "Text",
                                    "text": "${payload.trendIcon}",
                                    "fontSize": "64dp",
                                    "paddingLeft": "24dp"
                                },
                                {
                                    "type": "Text",
                                    "text": "${payload.trendText}",
                                    "fontSize": "32dp",
                                    "paddingLeft": "16dp"
                                }
                            ]
                        },
                        {
                            "type": "Text",
                            "text": "Updated ${payload.lastUpdated} · Last ${payload.elapsedHours} · Target ${payload.targetRange}",
                            "fontSize": "22dp",
                            "color": "#9AA5B1",
                            "paddingBottom": "16dp"
                        },
                        {
                            "type": "Sequence",
                            "height": "55vh",
                            "data": "${payload.rows}",
                            "items": [
                                {
                                    "type": "Container",
                                    "direction": "row",
                                    "paddingTop": "8dp",
                                    "paddingBottom": "8dp",
                                    "items": [
                                        {
                                            "type": "Text",
                                            "text": "${data.time}",
                                            "width": "35%",
                                            "fontSize": "26dp"
                                        },
                                        {
                                            "type": "Text",
                                            "text": "${data.statusIcon}",
                                            "width": "10%",
                                            "fontSize": "26dp"
                                        },
                                        {
                                            "type": "Text",
                                            "text": "${data.value}",
                                            "width": "40%",
                                            "fontSize": "26dp"
                                        },
                                        {
                                            "type": "Text",
                                            "text": "${data.trend}",
                                            "width": "15%",
                                            "fontSize": "26dp"
                                        }
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        }
    })
}

/// Full-screen remote chart image with a last-updated caption.
pub fn chart_document() -> Value {
    json!({
        "type": "APL",
        "version": APL_VERSION,
        "mainTemplate": {
            "parameters": ["payload"],
            "items": [
                {
                    "type": "Container",
                    "width": "100vw",
                    "height": "100vh",
                    "alignItems": "center",
                    "justifyContent": "center",
                    "items": [
                        {
                            "type": "Image",
                            "source": "${payload.graphUrl}",
                            "scale": "best-fit",
                            "width": "95vw",
                            "height": "95vh",
                            "align": "center"
                        },
                        {
                            "type": "Text",
                            "text": "Last updated: ${payload.timestamp}",
                            "position": "absolute",
                            "bottom": "8px",
                            "right": "24px",
                            "color": "gray",
                            "fontSize": "24px"
                        }
                    ]
                }
            ]
        },
        "onMount": [
            {
                "type": "AutoPage",
                "componentId": "pager",
                "duration": 300000
            }
        ]
    })
}
