use super::{FieldRef, Requirement};

use Requirement::{Mandatory as M, Optional as O};

const fn f(
    code: &'static str,
    name: &'static str,
    data_type: &'static str,
    length: &'static str,
    default_status: Requirement,
) -> FieldRef {
    let (usage, cardinality) = match default_status {
        M => ("Must use", "1/1"),
        O => ("Used when applicable", "0/1"),
    };
    FieldRef {
        code,
        name,
        usage,
        cardinality,
        data_type,
        length,
        default_status,
    }
}

/// Every element of the X12 810 (version 4010) invoice that the checker knows about.
///
/// Lengths of the space-padded ISA identifiers are content bounds, since element
/// values are trimmed before they are measured.
pub(super) static FIELDS: &[FieldRef] = &[
    // Interchange control header
    f("ISA01", "Authorization Information Qualifier", "ID", "2/2", M),
    f("ISA02", "Authorization Information", "AN", "1/10", O),
    f("ISA03", "Security Information Qualifier", "ID", "2/2", M),
    f("ISA04", "Security Information", "AN", "1/10", O),
    f("ISA05", "Interchange ID Qualifier", "ID", "2/2", M),
    f("ISA06", "Interchange Sender ID", "AN", "1/15", M),
    f("ISA07", "Interchange ID Qualifier", "ID", "2/2", M),
    f("ISA08", "Interchange Receiver ID", "AN", "1/15", M),
    f("ISA09", "Interchange Date", "DT", "6/6", M),
    f("ISA10", "Interchange Time", "TM", "4/4", M),
    f("ISA11", "Interchange Control Standards Identifier", "ID", "1/1", M),
    f("ISA12", "Interchange Control Version Number", "ID", "5/5", M),
    f("ISA13", "Interchange Control Number", "N0", "9/9", M),
    f("ISA14", "Acknowledgment Requested", "ID", "1/1", M),
    f("ISA15", "Usage Indicator", "ID", "1/1", M),
    f("ISA16", "Component Element Separator", "AN", "1/1", M),
    // Functional group header
    f("GS01", "Functional Identifier Code", "ID", "2/2", M),
    f("GS02", "Application Sender's Code", "AN", "2/15", M),
    f("GS03", "Application Receiver's Code", "AN", "2/15", M),
    f("GS04", "Date", "DT", "8/8", M),
    f("GS05", "Time", "TM", "4/8", M),
    f("GS06", "Group Control Number", "N0", "1/9", M),
    f("GS07", "Responsible Agency Code", "ID", "1/2", M),
    f("GS08", "Version / Release / Industry Identifier Code", "AN", "1/12", M),
    // Transaction set header
    f("ST01", "Transaction Set Identifier Code", "ID", "3/3", M),
    f("ST02", "Transaction Set Control Number", "AN", "4/9", M),
    // Beginning segment for invoice
    f("BIG01", "Invoice Date", "DT", "8/8", M),
    f("BIG02", "Invoice Number", "AN", "1/22", M),
    f("BIG03", "Purchase Order Date", "DT", "8/8", O),
    f("BIG04", "Purchase Order Number", "AN", "1/22", O),
    f("BIG05", "Release Number", "AN", "1/30", O),
    f("BIG06", "Change Order Sequence Number", "AN", "1/8", O),
    f("BIG07", "Transaction Type Code", "ID", "2/2", O),
    f("BIG08", "Transaction Set Purpose Code", "ID", "2/2", O),
    f("NTE01", "Note Reference Code", "ID", "3/3", O),
    f("NTE02", "Description", "AN", "1/80", O),
    f("CUR01", "Entity Identifier Code", "ID", "2/3", O),
    f("CUR02", "Currency Code", "ID", "3/3", O),
    f("CUR03", "Exchange Rate", "R", "4/10", O),
    f("REF01", "Reference Identification Qualifier", "ID", "2/3", O),
    f("REF02", "Reference Identification", "AN", "1/30", O),
    f("REF03", "Description", "AN", "1/80", O),
    f("PER01", "Contact Function Code", "ID", "2/2", O),
    f("PER02", "Name", "AN", "1/60", O),
    f("PER03", "Communication Number Qualifier", "ID", "2/2", O),
    f("PER04", "Communication Number", "AN", "1/80", O),
    // Name / address loop
    f("N101", "Entity Identifier Code", "ID", "2/3", O),
    f("N102", "Name", "AN", "1/60", O),
    f("N103", "Identification Code Qualifier", "ID", "1/2", O),
    f("N104", "Identification Code", "AN", "2/80", O),
    f("N201", "Name", "AN", "1/60", O),
    f("N202", "Name", "AN", "1/60", O),
    f("N301", "Address Information", "AN", "1/55", O),
    f("N302", "Address Information", "AN", "1/55", O),
    f("N401", "City Name", "AN", "2/30", O),
    f("N402", "State or Province Code", "ID", "2/2", O),
    f("N403", "Postal Code", "ID", "3/15", O),
    f("N404", "Country Code", "ID", "2/3", O),
    // Terms, dates, shipping
    f("ITD01", "Terms Type Code", "ID", "2/2", O),
    f("ITD02", "Terms Basis Date Code", "ID", "1/2", O),
    f("ITD03", "Terms Discount Percent", "R", "1/6", O),
    f("ITD04", "Terms Discount Due Date", "DT", "8/8", O),
    f("ITD05", "Terms Discount Days Due", "N0", "1/3", O),
    f("ITD06", "Terms Net Due Date", "DT", "8/8", O),
    f("ITD07", "Terms Net Days", "N0", "1/3", O),
    f("ITD08", "Terms Discount Amount", "N2", "1/10", O),
    f("ITD12", "Description", "AN", "1/80", O),
    f("DTM01", "Date/Time Qualifier", "ID", "3/3", O),
    f("DTM02", "Date", "DT", "8/8", O),
    f("FOB01", "Shipment Method of Payment", "ID", "2/2", O),
    f("FOB02", "Location Qualifier", "ID", "1/2", O),
    f("FOB03", "Description", "AN", "1/80", O),
    // Baseline item detail
    f("IT101", "Assigned Identification", "AN", "1/20", O),
    f("IT102", "Quantity Invoiced", "R", "1/10", O),
    f("IT103", "Unit or Basis for Measurement Code", "ID", "2/2", O),
    f("IT104", "Unit Price", "R", "1/17", O),
    f("IT105", "Basis of Unit Price Code", "ID", "2/2", O),
    f("IT106", "Product/Service ID Qualifier", "ID", "2/2", O),
    f("IT107", "Product/Service ID", "AN", "1/48", O),
    f("IT108", "Product/Service ID Qualifier", "ID", "2/2", O),
    f("IT109", "Product/Service ID", "AN", "1/48", O),
    f("PID01", "Item Description Type", "ID", "1/1", O),
    f("PID02", "Product/Process Characteristic Code", "ID", "2/3", O),
    f("PID03", "Agency Qualifier Code", "ID", "2/2", O),
    f("PID04", "Product Description Code", "AN", "1/12", O),
    f("PID05", "Description", "AN", "1/80", O),
    // Summary
    f("TDS01", "Total Invoice Amount", "N2", "1/15", M),
    f("TDS02", "Amount Subject to Terms Discount", "N2", "1/15", O),
    f("TDS03", "Discounted Amount Due", "N2", "1/15", O),
    f("TDS04", "Terms Discount Amount", "N2", "1/15", O),
    f("TXI01", "Tax Type Code", "ID", "2/2", O),
    f("TXI02", "Monetary Amount", "R", "1/18", O),
    f("TXI03", "Percent", "R", "1/10", O),
    f("SAC01", "Allowance or Charge Indicator", "ID", "1/1", O),
    f("SAC02", "Service, Promotion, Allowance, or Charge Code", "ID", "4/4", O),
    f("SAC05", "Amount", "N2", "1/15", O),
    f("SAC15", "Description", "AN", "1/80", O),
    f("ISS01", "Number of Units Shipped", "R", "1/10", O),
    f("ISS02", "Unit or Basis for Measurement Code", "ID", "2/2", O),
    f("ISS03", "Weight", "R", "1/10", O),
    f("ISS04", "Unit or Basis for Measurement Code", "ID", "2/2", O),
    f("CTT01", "Number of Line Items", "N0", "1/6", M),
    f("CTT02", "Hash Total", "R", "1/10", O),
    // Trailers
    f("SE01", "Number of Included Segments", "N0", "1/10", M),
    f("SE02", "Transaction Set Control Number", "AN", "4/9", M),
    f("GE01", "Number of Transaction Sets Included", "N0", "1/6", M),
    f("GE02", "Group Control Number", "N0", "1/9", M),
    f("IEA01", "Number of Included Functional Groups", "N0", "1/5", M),
    f("IEA02", "Interchange Control Number", "N0", "9/9", M),
];
