// Default resume content seeded into every new session.
// Bodies are markdown; the display layer renders them.

/// Section shown when nothing else resolves.
pub const DEFAULT_SECTION_KEY: &str = "summary";

pub const EMPTY_CONTENT: &str = "_No content for this section yet._";

pub struct DefaultSection {
    pub key: &'static str,
    pub label: &'static str,
    pub content: &'static str,
}

pub fn custom_section_content(label: &str) -> String {
    format!(
        "Custom section **{label}**. Upload and attach artefacts here from the Job Artefacts page."
    )
}

pub const DEFAULT_SECTIONS: &[DefaultSection] = &[
    DefaultSection {
        key: "summary",
        label: "Professional Summary",
        content: SUMMARY,
    },
    DefaultSection {
        key: "skills",
        label: "Skills",
        content: SKILLS,
    },
    DefaultSection {
        key: "competencies",
        label: "Core Competencies",
        content: COMPETENCIES,
    },
    DefaultSection {
        key: "experience",
        label: "Professional Experience",
        content: EXPERIENCE,
    },
    DefaultSection {
        key: "adaptability",
        label: "Adaptability to Emerging Trends",
        content: ADAPTABILITY,
    },
    DefaultSection {
        key: "services",
        label: "Business Arcitecture and Business Analysis Services",
        content: SERVICES,
    },
];

const SUMMARY: &str = "\
- Seasoned **IT Business Analyst & Business Architect** with 15+ years of experience across finance, higher education, retail, and healthcare
- **TOGAF 9.1** & **ITIL V3** certified; skilled at aligning business and IT via capability-based planning, process improvement, and Agile delivery.";

const SKILLS: &str = "\
- **Strategic & Leadership:** Enterprise Architecture (TOGAF), Business Capability Planning, Roadmaps, Business–IT Alignment, Team Leadership
- **Business Analysis:** Elicitation & Documentation (BRD, user stories, use cases), BPMN/CMMN/UML, Process Improvement, UAT Leadership, Solution Evaluation
- **Technical:** Identity & Access Management (IAM), SaaS/COTS configuration, SQL & data analysis, Systems Integration, ITSM (ITIL)
- **Tools & Methods:** Agile (Scrum/Kanban) & Waterfall, **Sparx EA**, **LeanIX**, **Jira**, **ServiceNow**, **Confluence**, **SharePoint**";

const COMPETENCIES: &str = "\
- **Business Architecture & Analysis:** Capability/Information/Org mapping, strategic roadmaps, target operating models
- **Requirements & Design:** BABOK-aligned analysis, solution design definition, traceability
- **Solution Assessment & Validation:** Fit-gap, COTS/SaaS configuration, test strategy & UAT
- **Stakeholder Engagement:** Workshops/JAD, cross-functional facilitation, clear communication to executives
- **Agile Delivery & Improvement:** Iterative delivery, continuous improvement, change enablement";

const EXPERIENCE: &str = "\
**Highlights:**
- Led cloud **legal case management** implementation and UAT at **WorkSafeBC**.
- At **UBC**, built capability maps, value streams, and target-state roadmaps; defined last‑mile integrations for **Workday**.
- At **ICBC**, introduced **Business Capability Planning**; reduced document management TCO by ~55% (from $1.6M to $0.7M); delivered **Oracle IAM** integration.
- At **Safeway**, established **ITAM/SAM** practice; integrated HPAM, CMDB, Remedy, LDAP, Lawson; implemented Sun **IAM**, CA **ESP** scheduling, and Symantec Endpoint.";

const ADAPTABILITY: &str = "\
Continuously aligns BA practice with **emerging trends**: enterprise cloud, SaaS, data-driven decisioning, automation, and architecture‑led transformation. \
Active in IIBA/BizArch communities; rapidly adopts new tools & methods to drive measurable outcomes.";

const SERVICES: &str = "\
**Business Architecture Services:**
- Developed comprehensive business architecture frameworks, including motivation models, governance models, and strategic roadmaps for organizations like Capilano University, BC Housing, and UBC, facilitating successful enterprise architecture practices and IT/business alignment.

**- Competency in:**
- Capability, Information & Organization Mapping
- Motivation, Benefits, As-Is and To-Be Target Operating Models
- Process Hierarchy Models
- Value Streams
- Strategic Roadmaps
- Business / IT Alignment maps
- Vision, Strategy, Objectives, and Measures Mapping


**Business Analysis Services:**
- Led requirement gathering, analysis, and documentation efforts across various projects, including CRM upgrades at Vancity, case management solutions at WorksafeBC, and enterprise system implementations at UBC. Notable for crafting detailed business cases, process maps, and user stories to guide project execution. 

**- Competency in:**
- Current state analysis and future state analysis documents 
- Requirements Definition Document 
- Epic, Feature and Stories
- Data Definition Requirements Document
- Gap Analysis Document 
- Assistance with UAT Document
- Business Process Maps
- System deployment documents (i.e., deployment plan, service desk guide, etc.)
- Progress status reports
- Business cases
- Resource Estimations
";
