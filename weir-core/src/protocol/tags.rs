//! FIX tag numbers understood by the gateway
//!
//! Only the subset the validator consumes is named; unknown tags pass
//! through the tokenizer untouched and are simply never read.

pub const BEGIN_STRING: u32 = 8;
pub const BODY_LENGTH: u32 = 9;
pub const CHECKSUM: u32 = 10;
pub const MSG_SEQ_NUM: u32 = 34;
pub const MSG_TYPE: u32 = 35;
pub const ORDER_QTY: u32 = 38;
pub const ORD_TYPE: u32 = 40;
pub const PRICE: u32 = 44;
pub const SENDER_COMP_ID: u32 = 49;
pub const SENDING_TIME: u32 = 52;
pub const SIDE: u32 = 54;
pub const SYMBOL: u32 = 55;
pub const TARGET_COMP_ID: u32 = 56;
pub const BID_PX: u32 = 132;
pub const OFFER_PX: u32 = 133;
pub const BID_SIZE: u32 = 134;
pub const OFFER_SIZE: u32 = 135;

/// Human-readable tag name for error messages and console output
pub fn tag_name(tag: u32) -> &'static str {
    match tag {
        BEGIN_STRING => "BeginString",
        BODY_LENGTH => "BodyLength",
        CHECKSUM => "CheckSum",
        MSG_SEQ_NUM => "MsgSeqNum",
        MSG_TYPE => "MsgType",
        ORDER_QTY => "OrderQty",
        ORD_TYPE => "OrdType",
        PRICE => "Price",
        SENDER_COMP_ID => "SenderCompID",
        SENDING_TIME => "SendingTime",
        SIDE => "Side",
        SYMBOL => "Symbol",
        TARGET_COMP_ID => "TargetCompID",
        BID_PX => "BidPx",
        OFFER_PX => "OfferPx",
        BID_SIZE => "BidSize",
        OFFER_SIZE => "OfferSize",
        _ => "Unknown",
    }
}
